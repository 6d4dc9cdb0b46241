use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{RequestError, RequestResult};

/// Per-call request options.
///
/// Headers are applied after the headers the client derives itself, so a
/// caller-supplied `Content-Type` wins over the one picked from the
/// `content_type` argument. Options compare by value, which the reactive
/// bindings use to decide whether to fetch again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    /// Forwarded to the transport; the client enforces no timeout itself
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header, replacing an earlier one with the same name (case-insensitive)
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overlay the caller headers onto `headers`
    pub(crate) fn apply_headers(&self, headers: &mut HeaderMap) -> RequestResult<()> {
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RequestError::transport(format!("Invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| RequestError::transport(format!("Invalid value for header '{}': {}", name, e)))?;
            headers.insert(name, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;

    #[test]
    fn test_caller_headers_replace_existing() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        RequestOptions::new()
            .header("content-type", "text/plain")
            .apply_headers(&mut headers)
            .unwrap();

        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let mut headers = HeaderMap::new();
        let error = RequestOptions::new()
            .header("bad header", "x")
            .apply_headers(&mut headers)
            .unwrap_err();
        assert!(error.message.contains("Invalid header name"));
    }

    #[test]
    fn test_header_replaces_same_name() {
        let options = RequestOptions::new()
            .header("X-Trace", "1")
            .header("accept", "text/plain")
            .header("x-trace", "2");

        assert_eq!(
            options.headers,
            vec![
                ("accept".to_string(), "text/plain".to_string()),
                ("x-trace".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(options, RequestOptions::new().header("accept", "text/plain").header("x-trace", "2"));
    }

    #[test]
    fn test_options_compare_by_value() {
        let a = RequestOptions::new().header("x-a", "1");
        let b = RequestOptions::new().header("x-a", "1");
        assert_eq!(a, b);
        assert_ne!(a, b.timeout(Duration::from_secs(1)));
    }
}
