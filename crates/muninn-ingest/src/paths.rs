use std::path::{Path, PathBuf};

/// All well-known files under the data root.
#[derive(Debug, Clone)]
pub struct StorePaths {
    pub root: PathBuf,
    pub insights_json: PathBuf,
    pub anchors_json: PathBuf,
    pub rejected_json: PathBuf,
    pub sync_status_json: PathBuf,
}

impl StorePaths {
    /// Derive all paths from a data root. Pure computation, no I/O.
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            insights_json: root.join("insights.json"),
            anchors_json: root.join("anchors.json"),
            rejected_json: root.join("rejected.json"),
            sync_status_json: root.join("sync_status.json"),
            root,
        }
    }

    /// Resolve a conversation archive path recorded in the sync index.
    /// Relative paths are anchored at the data root.
    pub fn archive(&self, archive_path: &str) -> PathBuf {
        let p = Path::new(archive_path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }

    /// Check whether the data root exists at all.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }
}

/// Pick the data root: explicit flag, then `MUNINN_DATA_DIR`, then the
/// platform data directory, then `./.muninn` as a last resort.
pub fn resolve_data_root(cli_override: Option<&Path>) -> PathBuf {
    if let Some(p) = cli_override {
        return p.to_path_buf();
    }
    if let Ok(v) = std::env::var("MUNINN_DATA_DIR") {
        if !v.is_empty() {
            return PathBuf::from(v);
        }
    }
    if let Some(base) = dirs::data_dir() {
        return base.join("muninn");
    }
    PathBuf::from(".muninn")
}
