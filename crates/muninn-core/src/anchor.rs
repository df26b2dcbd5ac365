use serde::{Deserialize, Serialize};

use crate::insight::UNCATEGORIZED;

/// A user-confirmed durable statement, promoted from an insight or entered
/// by hand. Read-only in this system; the write path lives elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub statement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<AnchorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Provenance of an anchor. `source.insight_id` is recorded, not validated;
/// it may point at an insight that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnchorSource {
    ElevatedFromInsight { insight_id: String },
    Manual,
    Baseline,
}

impl Anchor {
    /// Id of the insight this anchor was elevated from, if any.
    pub fn elevated_from(&self) -> Option<&str> {
        match &self.source {
            Some(AnchorSource::ElevatedFromInsight { insight_id }) => Some(insight_id),
            _ => None,
        }
    }

    pub fn display_category(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED)
    }
}

/// Marks an insight as permanently excluded from pending review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub insight_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
