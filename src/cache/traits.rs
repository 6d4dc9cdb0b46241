//! ResponseCache trait definition.

use async_trait::async_trait;

use crate::cache::CacheError;
use crate::client::Payload;

/// Trait for cache operations.
///
/// All cache backends must implement this trait to provide a unified interface.
/// Keys are request URLs, compared byte for byte.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ResponseCache: Send + Sync {
    /// Get a value from the cache.
    async fn get(&self, key: &str) -> Result<Option<Payload>, CacheError>;

    /// Store a value, replacing any previous one.
    async fn set(&self, key: &str, value: Payload) -> Result<(), CacheError>;

    /// Remove a value from the cache, returning it if present.
    async fn remove(&self, key: &str) -> Result<Option<Payload>, CacheError>;

    /// Clear all values from the cache.
    async fn clear(&self) -> Result<(), CacheError>;

    /// Number of stored entries.
    async fn len(&self) -> Result<usize, CacheError>;

    /// Whether a value is stored under `key`.
    async fn contains(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key).await?.is_some())
    }
}
