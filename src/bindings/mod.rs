//! Reactive bindings over [`CacheFetcher`](crate::client::CacheFetcher).
//!
//! Each binding owns a `tokio::sync::watch` channel holding its current
//! state. UI layers subscribe to the channel and re-render on change; the
//! bindings themselves add no caching or retry on top of the client.
//!
//! - [`QueryBinding`]: GET with loading state and dependency tracking
//! - [`MutationBinding`]: POST, PUT, PATCH and DELETE with submitting state

mod mutation;
mod query;

pub use mutation::{MutationBinding, MutationState};
pub use query::{QueryBinding, QueryState};
