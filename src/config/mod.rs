//! Configuration management for cache-fetcher
//!
//! Layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Per-environment files (development, test, staging, production)
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml`
//! 2. `{environment}.toml`
//! 3. `local.toml` (not committed to version control)
//! 4. `CACHE_FETCHER_*` environment variables
//!
//! # Example
//!
//! ```toml
//! [client]
//! user_agent = "my-app/1.0"
//! timeout_seconds = 30
//!
//! [cache]
//! enabled = true
//!
//! [logger]
//! level = "info"
//! ```

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{CacheConfig, ClientConfig, LoggerSettings, Settings};
