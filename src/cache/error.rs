//! Errors raised by cache backends.

use thiserror::Error;

/// A cache backend could not serve the request.
///
/// The client treats a failed read as a miss and a failed write or removal
/// as a warning; none of these reach the result envelope.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store was left unusable, e.g. by a poisoned lock
    #[error("Response cache unavailable: {0}")]
    Unavailable(String),
}
