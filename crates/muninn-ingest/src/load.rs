use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use muninn_core::{Anchor, Conversation, Insight, Message, RejectedRecord, SyncEntry, Tool};

use crate::normalize::{normalize_anchors, normalize_insights, normalize_rejected};
use crate::paths::StorePaths;

// ── Errors and per-source status ──

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outcome of loading one JSON source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SourceStatus {
    Loaded { count: usize },
    Missing,
    Failed { error: String },
}

impl SourceStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, SourceStatus::Failed { .. })
    }

    pub fn count(&self) -> usize {
        match self {
            SourceStatus::Loaded { count } => *count,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub insights: SourceStatus,
    pub anchors: SourceStatus,
    pub rejected: SourceStatus,
    pub sync: SourceStatus,
    pub archives_loaded: usize,
    pub archives_failed: usize,
}

impl LoadReport {
    /// The sync index is the load-critical source; only its failure is
    /// surfaced prominently in the UI. Everything else degrades quietly
    /// to an empty view.
    pub fn sync_failed(&self) -> bool {
        self.sync.is_failed()
    }
}

impl Default for LoadReport {
    fn default() -> Self {
        Self {
            insights: SourceStatus::Missing,
            anchors: SourceStatus::Missing,
            rejected: SourceStatus::Missing,
            sync: SourceStatus::Missing,
            archives_loaded: 0,
            archives_failed: 0,
        }
    }
}

// ── Snapshot ──

/// Immutable in-memory view of the whole store. All derived views
/// (cross-references, aggregations) are pure functions over this.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub conversations: Vec<Conversation>,
    pub insights: Vec<Insight>,
    pub anchors: Vec<Anchor>,
    pub rejected: Vec<RejectedRecord>,
    pub report: LoadReport,
}

impl Snapshot {
    /// Load everything under the data root. Infallible: each source that
    /// cannot be read contributes an empty collection and a report entry,
    /// and one bad source never blocks another.
    pub fn load(paths: &StorePaths) -> Snapshot {
        let (insights, insights_status) = load_source(&paths.insights_json, normalize_insights);
        let (anchors, anchors_status) = load_source(&paths.anchors_json, normalize_anchors);
        let (rejected, rejected_status) = load_source(&paths.rejected_json, normalize_rejected);
        let (index, sync_status) = load_sync_index(&paths.sync_status_json);

        let mut archives_loaded = 0usize;
        let mut archives_failed = 0usize;
        let mut conversations = Vec::with_capacity(index.len());
        for (tool, id, entry) in index {
            let mut conv = Conversation {
                id,
                tool,
                title: None,
                created: None,
                updated: None,
                messages: Vec::new(),
                tags: Vec::new(),
                sync: entry,
            };
            if let Some(rel) = conv.sync.archive_path.clone().filter(|p| !p.is_empty()) {
                match read_archive(&paths.archive(&rel)) {
                    Ok(archive) => {
                        conv.title = archive.title;
                        conv.created = archive.created;
                        conv.updated = archive.updated;
                        conv.messages = archive.messages;
                        conv.tags = archive.tags;
                        archives_loaded += 1;
                    }
                    Err(err) => {
                        // Keep the stub: the conversation still lists with
                        // its sync metadata and the default title.
                        tracing::warn!(conversation = %conv.id, %err, "failed to load conversation archive");
                        archives_failed += 1;
                    }
                }
            }
            conversations.push(conv);
        }

        Snapshot {
            conversations,
            insights,
            anchors,
            rejected,
            report: LoadReport {
                insights: insights_status,
                anchors: anchors_status,
                rejected: rejected_status,
                sync: sync_status,
                archives_loaded,
                archives_failed,
            },
        }
    }
}

// ── Source readers ──

/// Read and parse one JSON file. `Ok(None)` means the file is absent,
/// which is a normal state for a store that has not synced yet.
fn read_json(path: &Path) -> Result<Option<Value>, LoadError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_str(&text)?))
}

fn load_source<T>(path: &Path, normalize: impl Fn(&Value) -> Vec<T>) -> (Vec<T>, SourceStatus) {
    match read_json(path) {
        Ok(Some(raw)) => {
            let records = normalize(&raw);
            let status = SourceStatus::Loaded {
                count: records.len(),
            };
            (records, status)
        }
        Ok(None) => (Vec::new(), SourceStatus::Missing),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "source failed to load, substituting empty collection");
            (Vec::new(), SourceStatus::Failed {
                error: err.to_string(),
            })
        }
    }
}

/// Flatten the sync index into `(tool, conversation id, entry)` triples.
/// Unknown tool namespaces and malformed entries are skipped.
fn load_sync_index(path: &Path) -> (Vec<(Tool, String, SyncEntry)>, SourceStatus) {
    let raw = match read_json(path) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (Vec::new(), SourceStatus::Missing),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "sync index failed to load");
            return (Vec::new(), SourceStatus::Failed {
                error: err.to_string(),
            });
        }
    };
    let Some(tools) = raw.as_object() else {
        tracing::warn!(path = %path.display(), "sync index is not an object");
        return (Vec::new(), SourceStatus::Failed {
            error: "sync index is not an object".into(),
        });
    };

    let mut index = Vec::new();
    for (tool_name, entries) in tools {
        let Ok(tool) = tool_name.parse::<Tool>() else {
            tracing::debug!(tool = %tool_name, "skipping unknown tool namespace in sync index");
            continue;
        };
        let Some(entries) = entries.as_object() else {
            tracing::debug!(tool = %tool_name, "skipping non-object tool section in sync index");
            continue;
        };
        for (conversation_id, meta) in entries {
            match serde_json::from_value::<SyncEntry>(meta.clone()) {
                Ok(entry) => index.push((tool, conversation_id.clone(), entry)),
                Err(err) => {
                    tracing::debug!(conversation = %conversation_id, %err, "skipping malformed sync entry")
                }
            }
        }
    }
    let status = SourceStatus::Loaded { count: index.len() };
    (index, status)
}

/// On-disk shape of one conversation archive. The id and tool come from
/// the sync index, not from the file.
#[derive(Debug, Default, Deserialize)]
struct ArchiveFile {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    updated: Option<String>,
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    tags: Vec<String>,
}

fn read_archive(path: &Path) -> Result<ArchiveFile, LoadError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
