use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::domain::DomainError;
use crate::ports::KeyValueStore;

/// Key-value store backed by a single JSON object on disk.
///
/// The whole file is rewritten on every write: first to a sibling temp file,
/// then renamed over the original.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entries = Self::load_entries(&path)?;
        debug!(path = ?path, keys = entries.len(), "JsonFileStore opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn load_entries(path: &Path) -> Result<BTreeMap<String, String>, DomainError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = ?path, error = %e, "Storage file is malformed, starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), DomainError> {
        let content = serde_json::to_string_pretty(entries)?;
        let temp_path = self.path.with_extension("tmp");

        fs::write(&temp_path, content)
            .map_err(|e| DomainError::Storage(format!("write {:?}: {}", temp_path, e)))?;

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(DomainError::Storage(format!("rename to {:?}: {}", self.path, e)));
        }

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *entries = next;

        debug!(key = key, bytes = value.len(), "Stored value");
        Ok(())
    }
}
