//! The cache-backed HTTP client.
//!
//! [`CacheFetcher`] exposes the seven verb operations. GET responses are
//! cached by URL; POST, PUT, PATCH and DELETE invalidate the URL they target.
//! Every operation returns a result envelope rather than a `Result`.

mod body;
mod envelope;
mod fetcher;
mod options;
mod payload;


pub use body::{Body, content_type};
pub use envelope::{HeadResult, MutationResult, OptionsResult, QueryResult};
pub use fetcher::CacheFetcher;
pub use options::RequestOptions;
pub use payload::Payload;
