//! Shared data model for muninn: conversations, insights, anchors, and the
//! weak evidence references that link them.
//!
//! Everything here is plain data plus small pure helpers. Loading lives in
//! `muninn-ingest`; derived views live in `muninn-xref` and `muninn-aggregate`.

pub mod anchor;
pub mod clock;
pub mod conversation;
pub mod evidence;
pub mod insight;

pub use anchor::{Anchor, AnchorSource, RejectedRecord};
pub use conversation::{
    ContentBlock, Conversation, Message, MessageContent, Role, SyncEntry, Tool, UNTITLED,
};
pub use evidence::EvidenceRef;
pub use insight::{Insight, UNCATEGORIZED};
