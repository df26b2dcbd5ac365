use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceRef;

/// Render-time default for insights and anchors with no category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A synthesized statement derived from one or more conversations.
///
/// Optional fields stay optional through load; the neutral defaults
/// (`strength` 0, `category` "uncategorized") are applied by the render
/// helpers, not baked into the stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    /// Timestamp of the source conversation moment, the primary time axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_timestamp: Option<String>,
    /// When the insight was produced, the secondary time axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    /// Weak references of the form `tool/idFragment`, in citation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,
}

impl Insight {
    pub fn strength_or_zero(&self) -> f64 {
        self.strength.unwrap_or(0.0)
    }

    /// The category if present and non-empty. Empty strings count as
    /// unlabeled everywhere a missing category is special-cased.
    pub fn category_label(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn display_category(&self) -> &str {
        self.category_label().unwrap_or(UNCATEGORIZED)
    }

    /// Tool namespace of the first evidence entry, empty when uncited.
    pub fn source(&self) -> &str {
        self.evidence
            .first()
            .map(|e| EvidenceRef::source_tool(e))
            .unwrap_or("")
    }

    /// Epoch millis of `chat_timestamp`, `None` when absent or unparseable.
    pub fn chat_millis(&self) -> Option<i64> {
        self.chat_timestamp.as_deref().and_then(crate::clock::ts_millis)
    }

    /// Epoch millis of `last_seen`, `None` when absent or unparseable.
    pub fn generated_millis(&self) -> Option<i64> {
        self.last_seen.as_deref().and_then(crate::clock::ts_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(v: serde_json::Value) -> Insight {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn optional_fields_default() {
        let i = insight(serde_json::json!({"id": "i1", "content": "likes rust"}));
        assert_eq!(i.strength, None);
        assert_eq!(i.strength_or_zero(), 0.0);
        assert_eq!(i.display_category(), UNCATEGORIZED);
        assert!(i.evidence.is_empty());
    }

    #[test]
    fn empty_category_counts_as_unlabeled() {
        let i = insight(serde_json::json!({"id": "i1", "content": "c", "category": ""}));
        assert_eq!(i.category_label(), None);
        assert_eq!(i.display_category(), UNCATEGORIZED);
        let i = insight(serde_json::json!({"id": "i2", "content": "c", "category": "workflow"}));
        assert_eq!(i.category_label(), Some("workflow"));
    }

    #[test]
    fn source_is_first_evidence_tool() {
        let i = insight(serde_json::json!({
            "id": "i1",
            "content": "c",
            "evidence": ["claude-cli/conv-abc123", "gemini/other"]
        }));
        assert_eq!(i.source(), "claude-cli");
    }

    #[test]
    fn source_without_slash_is_whole_entry() {
        let i = insight(serde_json::json!({
            "id": "i1",
            "content": "c",
            "evidence": ["bare-reference"]
        }));
        assert_eq!(i.source(), "bare-reference");
    }

    #[test]
    fn source_empty_when_uncited() {
        let i = insight(serde_json::json!({"id": "i1", "content": "c"}));
        assert_eq!(i.source(), "");
    }

    #[test]
    fn chat_millis_parses_rfc3339() {
        let i = insight(serde_json::json!({
            "id": "i1",
            "content": "c",
            "chat_timestamp": "2025-01-01T00:00:00Z"
        }));
        assert_eq!(i.chat_millis(), Some(1_735_689_600_000));
        assert_eq!(i.generated_millis(), None);
    }

    #[test]
    fn round_trip_drops_absent_options() {
        let i = insight(serde_json::json!({"id": "i1", "content": "c"}));
        let back = serde_json::to_value(&i).unwrap();
        assert_eq!(back, serde_json::json!({"id": "i1", "content": "c"}));
    }
}
