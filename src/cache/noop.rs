//! NoOp cache implementation.
//!
//! Used when caching is disabled. All operations are no-ops, so every GET
//! goes to the network.

use async_trait::async_trait;

use crate::cache::{CacheError, ResponseCache};
use crate::client::Payload;

/// A no-operation cache that doesn't store anything.
///
/// Used when `cache.enabled = false` in configuration.
pub struct NoOpCache;

impl NoOpCache {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ResponseCache for NoOpCache {
    async fn get(&self, _key: &str) -> Result<Option<Payload>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Payload) -> Result<(), CacheError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<Option<Payload>, CacheError> {
        Ok(None)
    }

    async fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn len(&self) -> Result<usize, CacheError> {
        Ok(0)
    }
}
