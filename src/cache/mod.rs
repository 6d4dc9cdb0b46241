//! Response cache keyed by request URL.
//!
//! The client stores every successfully decoded GET body here and removes
//! the entry again whenever a mutating request targets the same URL.
//! Backends:
//! - Memory cache (in-process, unbounded, no expiry)
//! - NoOp cache (caching disabled)
//!
//! # Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! ```
//!
//! Caches are plain values handed to the client, never globals, so tests and
//! independent clients each get their own.

mod error;
mod memory;
mod noop;
mod traits;

use std::sync::Arc;

pub use error::CacheError;
pub use memory::MemoryCache;
pub use noop::NoOpCache;
pub use traits::ResponseCache;

pub use crate::config::settings::CacheConfig;

/// Build the cache backend selected by the configuration.
///
/// If caching is disabled, a [`NoOpCache`] is used.
pub fn cache_from_config(config: &CacheConfig) -> Arc<dyn ResponseCache> {
    if config.enabled {
        Arc::new(MemoryCache::new())
    } else {
        Arc::new(NoOpCache::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Payload;

    #[tokio::test]
    async fn test_enabled_config_builds_memory_cache() {
        let cache = cache_from_config(&CacheConfig { enabled: true });
        cache.set("k", Payload::from("v")).await.unwrap();
        assert!(cache.contains("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_disabled_config_builds_noop_cache() {
        let cache = cache_from_config(&CacheConfig { enabled: false });
        cache.set("k", Payload::from("v")).await.unwrap();
        assert!(!cache.contains("k").await.unwrap());
    }
}
