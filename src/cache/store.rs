//! Session-scoped key/value stores backing the result cache.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("Storage write failed: {0}")]
    WriteFailure(String),

    #[error("Storage read failed: {0}")]
    ReadFailure(String),
}

/// Raw string store that lives as long as one login session
pub trait SessionStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn write(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Drop every entry; called when the session ends
    fn clear(&self) -> Result<(), StoreError>;
}

fn footprint(entries: &HashMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

/// Process-local store, optionally capped at a byte quota
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    max_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A quota of 0 means unlimited
    pub fn with_quota(max_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_bytes: (max_bytes > 0).then_some(max_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = self.max_bytes {
            let replaced = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let needed = footprint(&entries) - replaced + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }

        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

/// Store persisted as one JSON object on disk so it survives between
/// invocations of the same login session
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    max_bytes: Option<usize>,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: None,
            lock: Mutex::new(()),
        }
    }

    /// A quota of 0 means unlimited
    pub fn with_quota(mut self, max_bytes: usize) -> Self {
        self.max_bytes = (max_bytes > 0).then_some(max_bytes);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A corrupt file reads as empty; the next write replaces it
    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let contents =
            fs::read_to_string(&self.path).map_err(|e| StoreError::ReadFailure(e.to_string()))?;

        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!("Session cache at {:?} is corrupt, ignoring it: {}", self.path, e);
                Ok(HashMap::new())
            }
        }
    }
}

impl SessionStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        // an unreadable file must not be replaced by this single entry
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value);

        let contents = serde_json::to_string(&entries)
            .map_err(|e| StoreError::WriteFailure(e.to_string()))?;

        if let Some(limit) = self.max_bytes {
            if contents.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    needed: contents.len(),
                    limit,
                });
            }
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::WriteFailure(e.to_string()))?;
        }
        fs::write(&self.path, contents).map_err(|e| StoreError::WriteFailure(e.to_string()))
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| StoreError::WriteFailure(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.write("a", "1".to_string()).unwrap();

        assert_eq!(store.read("a").unwrap(), Some("1".to_string()));
        assert_eq!(store.read("b").unwrap(), None);

        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(10);
        store.write("k1", "12345".to_string()).unwrap();

        let err = store.write("k2", "123456".to_string()).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { limit: 10, .. }));

        // overwriting an entry only counts the new size
        store.write("k1", "1234567".to_string()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_persists_between_handles() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session").join("cache.json");

        FileStore::open(&path).write("plan_1", "{\"x\":1}".to_string()).unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.read("plan_1").unwrap(), Some("{\"x\":1}".to_string()));
    }

    #[test]
    fn test_file_store_corrupt_file_reads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "not json at all").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.read("anything").unwrap(), None);

        store.write("fresh", "1".to_string()).unwrap();
        assert_eq!(store.read("fresh").unwrap(), Some("1".to_string()));
    }

    #[test]
    fn test_file_store_quota_and_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let store = FileStore::open(&path).with_quota(32);

        store.write("small", "1".to_string()).unwrap();
        let err = store.write("large", "x".repeat(64)).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(store.read("large").unwrap(), None);

        store.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_zero_quota_is_unlimited() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("cache.json")).with_quota(0);
        store.write("advice_1", "42".to_string()).unwrap();
        assert_eq!(store.read("advice_1").unwrap(), Some("42".to_string()));

        let memory = MemoryStore::with_quota(0);
        memory.write("advice_1", "x".repeat(1024)).unwrap();
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_file_store_unreadable_file_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::create_dir(&path).unwrap();

        let err = FileStore::open(&path)
            .write("plan_1", "1".to_string())
            .unwrap_err();
        assert!(matches!(err, StoreError::ReadFailure(_)));
        assert!(path.is_dir());
    }
}
