//! Decoded response bodies.

use http::HeaderMap;
use http::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{RequestError, RequestResult};

/// A decoded response body.
///
/// Responses that declare a JSON content type are parsed into a
/// [`serde_json::Value`]; everything else is kept as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Decode a buffered body according to the response's `Content-Type`.
    ///
    /// An empty body (a 204, or a 201 with nothing to say) decodes to empty
    /// text whatever the declared type.
    pub fn decode(headers: &HeaderMap, body: &[u8]) -> RequestResult<Self> {
        if body.trim_ascii().is_empty() {
            return Ok(Payload::Text(String::new()));
        }

        let declares_json = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_content_type);

        if declares_json {
            serde_json::from_slice(body)
                .map(Payload::Json)
                .map_err(RequestError::decode)
        } else {
            Ok(Payload::Text(String::from_utf8_lossy(body).into_owned()))
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Json(_) => None,
        }
    }

    /// Deserialize the payload into a typed value.
    ///
    /// Text payloads are parsed as JSON, so a server that forgets to label its
    /// JSON responses still yields typed data.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Payload::Json(value) => T::deserialize(value),
            Payload::Text(text) => serde_json::from_str(text),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

/// `application/json` or any `+json` structured syntax suffix, parameters ignored
pub(crate) fn is_json_content_type(value: &str) -> bool {
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}
