use serde::Serialize;
use thiserror::Error;

/// The single failure kind surfaced by every client operation.
///
/// Covers non-2xx responses, transport failures, undecodable response bodies
/// and requests that could not be built (bad header, unencodable body). The
/// only thing that tells them apart is the message and whether a status code
/// is attached.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("An error occurred: {message}")]
pub struct RequestError {
    /// HTTP status code, when the server answered with a non-2xx status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Status text or the underlying error's description
    pub message: String,
}

impl RequestError {
    /// Failure for a response that arrived with a non-2xx status
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: status_text.into(),
        }
    }

    /// Failure raised before or while talking to the server
    pub fn transport(error: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            message: error.to_string(),
        }
    }

    /// Failure while encoding the request body
    pub fn body(reason: impl Into<String>) -> Self {
        Self {
            status: None,
            message: format!("Invalid request body: {}", reason.into()),
        }
    }

    /// Failure while decoding the response body
    pub fn decode(error: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            message: format!("Failed to decode response body: {}", error),
        }
    }
}

/// Type alias for results of a single HTTP exchange
pub type RequestResult<T> = Result<T, RequestError>;
