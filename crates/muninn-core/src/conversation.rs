use serde::{Deserialize, Serialize};

/// Render-time default for conversations with no title.
pub const UNTITLED: &str = "Untitled Conversation";

/// Tool namespace a conversation was synced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Claude,
    Gemini,
}

impl Tool {
    pub const ALL: [Tool; 2] = [Tool::Claude, Tool::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Claude => "claude",
            Tool::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tool {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "claude" => Ok(Tool::Claude),
            "gemini" => Ok(Tool::Gemini),
            other => anyhow::bail!("unknown tool namespace: {other}"),
        }
    }
}

/// Message author role. Gemini archives say `model` where Claude says
/// `assistant`; anything unrecognized collapses to `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    User,
    Assistant,
    #[default]
    Other,
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "user" | "human" => Role::User,
            "assistant" | "model" => Role::Assistant,
            _ => Role::Other,
        }
    }
}

/// Message body: a plain string or a list of structured blocks
/// (the Claude-style `{type, text}` content array).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl MessageContent {
    /// Flatten to plain text. Block content keeps only `text` blocks,
    /// joined with newlines; tool_use blocks and the like are skipped.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter(|b| b.kind == "text")
                .map(|b| b.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Per-conversation sync provenance, recorded by the external sync tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_synced: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_path: Option<String>,
}

/// A synced conversation, loaded read-only from its archive file.
/// Only conversations listed in the sync index are ever loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub tool: Tool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sync: SyncEntry,
}

impl Conversation {
    /// Display title with the render-time default applied.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED)
    }

    /// Loaded message count, falling back to the sync index count when the
    /// archive carried no messages.
    pub fn message_count(&self) -> usize {
        if self.messages.is_empty() {
            self.sync.message_count.unwrap_or(0) as usize
        } else {
            self.messages.len()
        }
    }

    /// Epoch millis of `updated`, `None` when absent or unparseable.
    pub fn updated_millis(&self) -> Option<i64> {
        self.updated.as_deref().and_then(crate::clock::ts_millis)
    }
}
