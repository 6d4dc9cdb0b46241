//! Transport abstraction for performing HTTP requests.
//!
//! The client never talks to the network directly. It hands a fully built
//! [`HttpRequest`] to a [`Transport`] and gets back a buffered
//! [`HttpResponse`]. Two implementations exist:
//!
//! - [`ReqwestTransport`] on native targets, backed by a pooled `reqwest::Client`
//! - [`BrowserTransport`] on `wasm32`, backed by the browser `fetch` API
//!
//! [`default_transport`] picks one of them once, at construction time, based
//! on the compilation target.

mod form;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(test)]
pub(crate) mod scripted;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::{HeaderMap, Method};

use crate::error::RequestResult;

pub use form::{FormData, FormPart, FormValue};

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTransport;
#[cfg(not(target_arch = "wasm32"))]
pub use native::ReqwestTransport;

/// Request body after content-type formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Bytes(Vec<u8>),
    Multipart(FormData),
}

/// A request ready to be sent
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
    /// Per-request timeout; `None` leaves the transport default in place
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }
}

/// Simple structure for HTTP responses.
///
/// All fields reflect the received response as-is. The body is fully
/// buffered; decoding happens in the client.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Numeric HTTP status code (e.g., `200`, `404`)
    pub status: u16,

    /// Human-readable reason phrase (e.g., `"OK"`, `"Not Found"`).
    ///
    /// May be `"Unknown"` for non-standard codes.
    pub status_text: String,

    /// Response headers as a case-insensitive map
    pub headers: HeaderMap,

    /// Raw response body bytes
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability to perform a single HTTP exchange.
///
/// Implementations report non-2xx responses as `Ok`; only failures to get a
/// response at all are errors. Status interpretation belongs to the client.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Transport: Send + Sync {
    /// Send the request and buffer the full response
    async fn send(&self, request: HttpRequest) -> RequestResult<HttpResponse>;

    /// Returns the transport name for logging
    fn name(&self) -> &'static str;
}

/// Transport for the current compilation target with default settings
#[cfg(not(target_arch = "wasm32"))]
pub fn default_transport() -> RequestResult<Arc<dyn Transport>> {
    Ok(Arc::new(ReqwestTransport::new(&crate::config::settings::ClientConfig::default())?))
}

/// Transport for the current compilation target with default settings
#[cfg(target_arch = "wasm32")]
pub fn default_transport() -> RequestResult<Arc<dyn Transport>> {
    Ok(Arc::new(BrowserTransport::new()))
}
