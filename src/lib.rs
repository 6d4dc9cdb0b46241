//! Cache-Fetcher Library
//!
//! A cache-backed HTTP client. GET responses are cached by URL, writes to a
//! URL invalidate its entry, and every operation reports through a uniform
//! result envelope. Reactive bindings publish the same results as observable
//! state for UI code.

use shadow_rs::shadow;
shadow!(build);

pub mod bindings;
pub mod cache;
#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod transport;

pub use bindings::{MutationBinding, MutationState, QueryBinding, QueryState};
pub use client::{
    Body, CacheFetcher, HeadResult, MutationResult, OptionsResult, Payload, QueryResult,
    RequestOptions,
};
pub use error::{RequestError, RequestResult};
pub use transport::{Transport, default_transport};

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
