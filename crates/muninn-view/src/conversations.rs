use serde::{Deserialize, Serialize};

use muninn_core::{clock, Conversation, Tool};

/// UI state of the conversations tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationsView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_filter: Option<Tool>,
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_newest_first")]
    pub newest_first: bool,
    #[serde(default)]
    pub selected: usize,
}

fn default_newest_first() -> bool {
    true
}

impl Default for ConversationsView {
    fn default() -> Self {
        ConversationsView {
            tool_filter: None,
            search: String::new(),
            newest_first: true,
            selected: 0,
        }
    }
}

impl ConversationsView {
    /// Conversation list rows under the current filter, search, and
    /// order. Search is a case-insensitive substring test across title,
    /// id, and tags.
    pub fn rows<'a>(&self, conversations: &'a [Conversation]) -> Vec<&'a Conversation> {
        let needle = self.search.to_lowercase();
        let mut rows: Vec<&Conversation> = conversations
            .iter()
            .filter(|c| self.tool_filter.map_or(true, |t| c.tool == t))
            .filter(|c| {
                needle.is_empty()
                    || c.display_title().to_lowercase().contains(&needle)
                    || c.id.to_lowercase().contains(&needle)
                    || c.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
            })
            .collect();
        rows.sort_by(|a, b| {
            let (ka, kb) = (activity_key(a), activity_key(b));
            if self.newest_first {
                kb.cmp(&ka)
            } else {
                ka.cmp(&kb)
            }
        });
        rows
    }

    /// Cycle the tool filter: all, claude, gemini, back to all.
    pub fn cycle_tool_filter(&mut self) {
        self.tool_filter = match self.tool_filter {
            None => Some(Tool::Claude),
            Some(Tool::Claude) => Some(Tool::Gemini),
            Some(Tool::Gemini) => None,
        };
    }

    pub fn toggle_order(&mut self) {
        self.newest_first = !self.newest_first;
    }

    /// Keep the selection on a valid row after the row set changes.
    pub fn clamp_selection(&mut self, row_count: usize) {
        if row_count == 0 {
            self.selected = 0;
        } else if self.selected >= row_count {
            self.selected = row_count - 1;
        }
    }

    pub fn select_next(&mut self, row_count: usize) {
        if self.selected + 1 < row_count {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// Sort key for list order: updated, then created, then the sync time,
/// with never-dated conversations last under newest-first.
fn activity_key(c: &Conversation) -> i64 {
    c.updated_millis()
        .or_else(|| c.created.as_deref().and_then(clock::ts_millis))
        .or_else(|| c.sync.last_synced.as_deref().and_then(clock::ts_millis))
        .unwrap_or(i64::MIN)
}
