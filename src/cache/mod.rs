//! Session-lived cache for AI results.
//!
//! The cache is an optimization only. Reads never fail (anything unusable is a
//! miss) and writes never fail (storage errors are logged and dropped).

mod flight;
mod key;
pub mod store;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use flight::{Flight, FlightGuard};
pub use key::stable_key;
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};

/// Read-through/write-through cache over a session store.
///
/// Create one per login session and hand it to whoever needs it.
#[derive(Clone)]
pub struct ResultCache {
    store: Option<Arc<dyn SessionStore>>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store: Some(store) }
    }

    /// In-memory cache for the lifetime of this process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Cache that never holds anything
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let store = self.store.as_ref()?;

        let raw = match store.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("Cache miss for {}", key);
                return None;
            }
            Err(e) => {
                tracing::warn!("Cache read for {} failed, treating as miss: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!("Cache hit for {}", key);
                Some(value)
            }
            Err(e) => {
                tracing::debug!("Cached value for {} is malformed, treating as miss: {}", key, e);
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let Some(store) = self.store.as_ref() else {
            return;
        };

        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Could not serialize cache value for {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = store.write(key, raw) {
            tracing::warn!("Cache write for {} dropped: {}", key, e);
        }
    }

    /// End of session: drop everything
    pub fn clear(&self) {
        if let Some(store) = self.store.as_ref() {
            if let Err(e) = store.clear() {
                tracing::warn!("Could not clear session cache: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AiAdvice;

    fn advice() -> AiAdvice {
        AiAdvice {
            summary: "Keep going".to_string(),
            tips: vec!["Hydrate".to_string()],
            warnings: vec![],
        }
    }

    #[test]
    fn test_set_then_get() {
        let cache = ResultCache::in_memory();
        cache.set("advice_1", &advice());

        let cached: Option<AiAdvice> = cache.get("advice_1");
        assert_eq!(cached, Some(advice()));
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store.write("advice_1", "{not valid json".to_string()).unwrap();
        let cache = ResultCache::new(store);

        let cached: Option<AiAdvice> = cache.get("advice_1");
        assert!(cached.is_none());
    }

    #[test]
    fn test_wrong_shape_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store.write("advice_1", "[1, 2, 3]".to_string()).unwrap();
        let cache = ResultCache::new(store);

        assert!(cache.get::<AiAdvice>("advice_1").is_none());
    }

    #[test]
    fn test_quota_failure_is_swallowed() {
        let cache = ResultCache::new(Arc::new(MemoryStore::with_quota(8)));
        cache.set("advice_1", &advice());

        assert!(cache.get::<AiAdvice>("advice_1").is_none());
    }

    #[test]
    fn test_disabled_cache() {
        let cache = ResultCache::disabled();
        cache.set("advice_1", &advice());
        assert!(cache.get::<AiAdvice>("advice_1").is_none());
        assert!(!cache.is_enabled());
    }

    #[test]
    fn test_clear_ends_session() {
        let cache = ResultCache::in_memory();
        cache.set("advice_1", &advice());
        cache.clear();
        assert!(cache.get::<AiAdvice>("advice_1").is_none());
    }
}
