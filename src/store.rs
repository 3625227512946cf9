//! Persistence of the enabled-plugin set.
//!
//! The persisted value is a JSON array of plugin id strings held in a
//! single slot, rewritten in full after every enable/disable. The store is
//! injected into the manager so embedders and tests can substitute their
//! own backing (the editor shell maps this onto its settings storage).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tracing::warn;

/// Keyed storage slot for the enabled plugin ids.
pub trait SettingsStore: Send + Sync {
    /// Load the persisted ids, in their persisted (insertion) order.
    /// Missing or unreadable state loads as empty.
    fn load(&self) -> Vec<String>;

    /// Replace the persisted set in full.
    fn save(&self, enabled: &[String]) -> Result<()>;
}

/// File-backed store: one JSON array in one file, replaced atomically.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Vec<String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed enabled-plugin state");
                Vec::new()
            }
        }
    }

    fn save(&self, enabled: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string(enabled)?;
        // Write-then-rename so a crash mid-write never truncates the slot.
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let tmp = tempfile::NamedTempFile::new_in(dir)
            .context("failed to create temp file for enabled-plugin state")?;
        std::fs::write(tmp.path(), content)
            .context("failed to write enabled-plugin state")?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory store for tests and disk-less embeddings.
#[derive(Default)]
pub struct MemoryStore {
    contents: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with ids, as if persisted by a prior session.
    pub fn with_ids(ids: &[&str]) -> Self {
        Self {
            contents: Mutex::new(ids.iter().map(|s| (*s).to_string()).collect()),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Vec<String> {
        self.contents.lock().clone()
    }

    fn save(&self, enabled: &[String]) -> Result<()> {
        *self.contents.lock() = enabled.to_vec();
        Ok(())
    }
}
