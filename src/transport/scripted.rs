//! Scripted in-memory transport for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method};

use super::{HttpRequest, HttpResponse, Transport};
use crate::error::{RequestError, RequestResult};

/// Answers requests from a route table and records everything it receives.
///
/// Unknown routes answer `404 Not Found`.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), RequestResult<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: Method, url: &str, response: RequestResult<HttpResponse>) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, url.to_string()), response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> RequestResult<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = (request.method.clone(), request.url.clone());
        self.requests.lock().unwrap().push(request);

        self.routes
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Ok(response(404, "Not Found", None, "")))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub(crate) fn response(
    status: u16,
    status_text: &str,
    content_type: Option<&str>,
    body: &str,
) -> HttpResponse {
    let mut headers = HeaderMap::new();
    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
    }
    HttpResponse {
        status,
        status_text: status_text.to_string(),
        headers,
        body: body.as_bytes().to_vec(),
    }
}

pub(crate) fn json_ok(body: &str) -> RequestResult<HttpResponse> {
    Ok(response(200, "OK", Some("application/json"), body))
}

pub(crate) fn text_ok(body: &str) -> RequestResult<HttpResponse> {
    Ok(response(200, "OK", Some("text/plain"), body))
}

pub(crate) fn transport_error(message: &str) -> RequestResult<HttpResponse> {
    Err(RequestError::transport(message))
}
