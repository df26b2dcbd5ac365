//! Evidence strings are weak references, not foreign keys.
//!
//! The sync tool records `tool/idFragment` where the fragment may be a
//! truncated or re-prefixed form of the conversation id, and the format
//! drifts between sync runs. Matching is therefore substring containment
//! in both directions, never exact equality.

/// A borrowed, split view of one evidence string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvidenceRef<'a> {
    pub tool: &'a str,
    pub fragment: &'a str,
}

impl<'a> EvidenceRef<'a> {
    /// Split on the first `/`. Entries without a separator carry no
    /// fragment to match on and yield `None`.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let (tool, fragment) = raw.split_once('/')?;
        Some(EvidenceRef { tool, fragment })
    }

    /// Tool-namespace portion of a raw evidence string: text before the
    /// first `/`, or the whole string when there is none.
    pub fn source_tool(raw: &str) -> &str {
        raw.split('/').next().unwrap_or(raw)
    }

    /// Bidirectional containment test against a conversation id.
    /// Empty fragments and empty ids never match.
    pub fn matches_conversation(&self, conversation_id: &str) -> bool {
        if self.fragment.is_empty() || conversation_id.is_empty() {
            return false;
        }
        conversation_id.contains(self.fragment) || self.fragment.contains(conversation_id)
    }
}
