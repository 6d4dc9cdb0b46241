//! Result envelopes returned by the client operations.
//!
//! Every operation returns one of these instead of a `Result`; failures are
//! reported through `is_error` and `error`. Field names serialize in
//! camelCase (`isLoading`, `isError`).

use std::collections::BTreeMap;

use http::HeaderMap;
use serde::Serialize;

use crate::client::Payload;
use crate::error::RequestError;

/// Envelope for `get`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub data: Option<Payload>,
    /// Always `false` once the operation has returned
    pub is_loading: bool,
    pub is_error: bool,
    pub error: Option<RequestError>,
}

impl QueryResult {
    pub(crate) fn success(data: Payload) -> Self {
        Self {
            data: Some(data),
            is_loading: false,
            is_error: false,
            error: None,
        }
    }

    pub(crate) fn failure(error: RequestError) -> Self {
        Self {
            data: None,
            is_loading: false,
            is_error: true,
            error: Some(error),
        }
    }

    /// Collapse the envelope into a `Result`
    pub fn into_result(self) -> Result<Option<Payload>, RequestError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}

/// Envelope for `post`, `put`, `patch` and `delete`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    pub data: Option<Payload>,
    pub is_error: bool,
    pub error: Option<RequestError>,
}

impl MutationResult {
    pub(crate) fn success(data: Payload) -> Self {
        Self {
            data: Some(data),
            is_error: false,
            error: None,
        }
    }

    pub(crate) fn failure(error: RequestError) -> Self {
        Self {
            data: None,
            is_error: true,
            error: Some(error),
        }
    }

    pub fn into_result(self) -> Result<Option<Payload>, RequestError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}

/// Envelope for `head`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadResult {
    /// Response headers; repeated headers are joined with `", "`
    pub headers: Option<BTreeMap<String, String>>,
    pub status: Option<u16>,
    pub is_error: bool,
    pub error: Option<RequestError>,
}

impl HeadResult {
    pub(crate) fn success(status: u16, headers: &HeaderMap) -> Self {
        Self {
            headers: Some(flatten_headers(headers)),
            status: Some(status),
            is_error: false,
            error: None,
        }
    }

    pub(crate) fn failure(error: RequestError) -> Self {
        Self {
            headers: None,
            status: None,
            is_error: true,
            error: Some(error),
        }
    }
}

/// Envelope for `options`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResult {
    /// Decoded body describing the server's capabilities
    pub options: Option<Payload>,
    pub is_error: bool,
    pub error: Option<RequestError>,
}

impl OptionsResult {
    pub(crate) fn success(options: Payload) -> Self {
        Self {
            options: Some(options),
            is_error: false,
            error: None,
        }
    }

    pub(crate) fn failure(error: RequestError) -> Self {
        Self {
            options: None,
            is_error: true,
            error: Some(error),
        }
    }
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            (name.as_str().to_string(), joined)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use serde_json::json;

    #[test]
    fn test_query_result_serializes_camel_case() {
        let result = QueryResult::success(Payload::Json(json!({ "id": 1 })));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "data": { "id": 1 }, "isLoading": false, "isError": false, "error": null })
        );
    }

    #[test]
    fn test_failure_has_no_data() {
        let result = MutationResult::failure(RequestError::status(500, "Internal Server Error"));
        assert!(result.is_error);
        assert!(result.data.is_none());
        assert_eq!(result.into_result().unwrap_err().status, Some(500));
    }

    #[test]
    fn test_head_joins_repeated_headers() {
        let mut headers = HeaderMap::new();
        headers.append("vary", HeaderValue::from_static("accept"));
        headers.append("vary", HeaderValue::from_static("origin"));
        headers.insert("content-length", HeaderValue::from_static("42"));

        let result = HeadResult::success(200, &headers);
        let flattened = result.headers.unwrap();
        assert_eq!(flattened["vary"], "accept, origin");
        assert_eq!(flattened["content-length"], "42");
        assert_eq!(result.status, Some(200));
    }
}
