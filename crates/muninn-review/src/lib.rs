//! Review workflow: which insights still need a human decision, and the
//! linear queue a reviewer walks through.
//!
//! Nothing in this crate writes anything. Decisions live in the queue for
//! the duration of a pass; durable promotion to anchors belongs to an
//! external write path.

pub mod pending;
pub mod queue;

pub use pending::pending_insights;
pub use queue::{QueueItem, ReviewAction, ReviewOutcome, ReviewQueue, ReviewStatus};
