//! Per-tab view state for the dashboard.
//!
//! Each tab owns one plain, serializable state struct: current filter,
//! search text, sort, selection. State is always passed into pure row
//! builders by reference; nothing here reads globals or mutates the
//! snapshot, so every view is testable without a terminal.

pub mod anchors;
pub mod conversations;
pub mod insights;

pub use anchors::AnchorsView;
pub use conversations::ConversationsView;
pub use insights::InsightsView;
