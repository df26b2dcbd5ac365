//! Loading layer: finds the synced data store on disk and reads its four
//! JSON sources into an in-memory [`Snapshot`].
//!
//! Loading is deliberately tolerant. A missing or unreadable source becomes
//! an empty collection and a note in the [`LoadReport`]; it never aborts the
//! rest of the load. The store is read-only for this crate.

pub mod load;
pub mod normalize;
pub mod paths;

pub use load::{LoadError, LoadReport, Snapshot, SourceStatus};
pub use normalize::{normalize_anchors, normalize_insights, normalize_rejected};
pub use paths::{resolve_data_root, StorePaths};
