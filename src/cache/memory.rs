//! Memory cache implementation using cached::UnboundCache.

use std::sync::Mutex;

use async_trait::async_trait;
use cached::{Cached, UnboundCache};

use crate::cache::{CacheError, ResponseCache};
use crate::client::Payload;

/// In-memory cache without size limit or expiry.
///
/// Entries live until they are removed or the cache is dropped. The mutex
/// only protects the map itself; callers get no atomicity across a
/// read-fetch-write sequence.
pub struct MemoryCache {
    store: Mutex<UnboundCache<String, Payload>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(UnboundCache::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, UnboundCache<String, Payload>>, CacheError> {
        self.store
            .lock()
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Payload>, CacheError> {
        let mut store = self.lock()?;
        Ok(store.cache_get(key).cloned())
    }

    async fn set(&self, key: &str, value: Payload) -> Result<(), CacheError> {
        let mut store = self.lock()?;
        store.cache_set(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<Option<Payload>, CacheError> {
        let mut store = self.lock()?;
        Ok(store.cache_remove(key))
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut store = self.lock()?;
        store.cache_clear();
        Ok(())
    }

    async fn len(&self) -> Result<usize, CacheError> {
        let store = self.lock()?;
        Ok(store.cache_size())
    }
}
