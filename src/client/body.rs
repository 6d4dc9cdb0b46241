//! Request bodies and their formatting by content type.

use serde::Serialize;
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::{RequestError, RequestResult};
use crate::transport::{FormData, RequestBody};

/// Content types with dedicated body formatting
pub mod content_type {
    pub const JSON: &str = "application/json";
    pub const MULTIPART: &str = "multipart/form-data";
    pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
}

/// Body handed to a mutating call, before formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
    Form(FormData),
}

/// Result of formatting a [`Body`] for a content type
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EncodedBody {
    /// `Content-Type` header to send; `None` lets the transport decide
    pub content_type: Option<String>,
    pub body: Option<RequestBody>,
}

impl Body {
    /// Serialize any value into a JSON body
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Body::Json)
    }

    /// Format the body for `content_type`.
    ///
    /// - `application/json`: JSON text, header set
    /// - `multipart/form-data`: unmodified, no header (the transport adds the boundary)
    /// - `application/x-www-form-urlencoded`: `key=value` pairs, header set
    /// - anything else: unmodified, header set to the literal content type
    pub(crate) fn encode(self, content_type: &str) -> RequestResult<EncodedBody> {
        let content_type = content_type.trim();

        if content_type.eq_ignore_ascii_case(content_type::JSON) {
            Ok(EncodedBody {
                content_type: Some(content_type::JSON.to_string()),
                body: self.into_json_text()?.map(RequestBody::Bytes),
            })
        } else if content_type.eq_ignore_ascii_case(content_type::MULTIPART) {
            Ok(EncodedBody {
                content_type: None,
                body: self.into_raw(),
            })
        } else if content_type.eq_ignore_ascii_case(content_type::FORM_URLENCODED) {
            Ok(EncodedBody {
                content_type: Some(content_type::FORM_URLENCODED.to_string()),
                body: Some(RequestBody::Bytes(self.into_urlencoded()?.into_bytes())),
            })
        } else {
            Ok(EncodedBody {
                content_type: Some(content_type.to_string()),
                body: self.into_raw(),
            })
        }
    }

    fn into_json_text(self) -> RequestResult<Option<Vec<u8>>> {
        let text = match self {
            Body::Empty => return Ok(None),
            Body::Json(value) => value.to_string(),
            // Already serialized by the caller
            Body::Bytes(bytes) => return Ok(Some(bytes)),
            Body::Text(text) => Value::String(text).to_string(),
            Body::Form(form) => {
                let pairs = form.text_pairs().map_err(|name| {
                    RequestError::body(format!("file field '{}' cannot be sent as JSON", name))
                })?;
                let object: Map<String, Value> = pairs
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
                    .collect();
                Value::Object(object).to_string()
            }
        };
        Ok(Some(text.into_bytes()))
    }

    fn into_urlencoded(self) -> RequestResult<String> {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        match self {
            Body::Empty => {}
            Body::Json(Value::Object(map)) => {
                for (key, value) in &map {
                    serializer.append_pair(key, &form_value(value));
                }
            }
            Body::Json(other) => {
                return Err(RequestError::body(format!(
                    "only JSON objects can be form-encoded, got {}",
                    json_kind(&other)
                )));
            }
            Body::Text(query) => {
                serializer.extend_pairs(parse_query(&query));
            }
            Body::Bytes(bytes) => {
                serializer.extend_pairs(parse_query(&String::from_utf8_lossy(&bytes)));
            }
            Body::Form(form) => {
                let pairs = form.text_pairs().map_err(|name| {
                    RequestError::body(format!("file field '{}' cannot be form-encoded", name))
                })?;
                serializer.extend_pairs(pairs);
            }
        }
        Ok(serializer.finish())
    }

    fn into_raw(self) -> Option<RequestBody> {
        match self {
            Body::Empty => None,
            Body::Json(value) => Some(RequestBody::Bytes(value.to_string().into_bytes())),
            Body::Text(text) => Some(RequestBody::Bytes(text.into_bytes())),
            Body::Bytes(bytes) => Some(RequestBody::Bytes(bytes)),
            Body::Form(form) => Some(RequestBody::Multipart(form)),
        }
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Strings go in as-is, everything else as its JSON text
fn form_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<FormData> for Body {
    fn from(form: FormData) -> Self {
        Body::Form(form)
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Body::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bytes_of(encoded: &EncodedBody) -> &[u8] {
        match &encoded.body {
            Some(RequestBody::Bytes(bytes)) => bytes,
            other => panic!("expected a byte body, got {:?}", other),
        }
    }

    #[test]
    fn test_json_object() {
        let encoded = Body::from(json!({ "a": 1 })).encode(content_type::JSON).unwrap();
        assert_eq!(encoded.content_type.as_deref(), Some("application/json"));
        assert_eq!(bytes_of(&encoded), br#"{"a":1}"#);
    }

    #[test]
    fn test_json_text_is_quoted() {
        let encoded = Body::from("hi").encode(content_type::JSON).unwrap();
        assert_eq!(bytes_of(&encoded), br#""hi""#);
    }

    #[test]
    fn test_json_bytes_pass_through() {
        let encoded = Body::from(br#"[1,2]"#.to_vec()).encode(content_type::JSON).unwrap();
        assert_eq!(bytes_of(&encoded), b"[1,2]");
    }

    #[test]
    fn test_json_empty_has_no_body() {
        let encoded = Body::Empty.encode(content_type::JSON).unwrap();
        assert_eq!(encoded.content_type.as_deref(), Some("application/json"));
        assert!(encoded.body.is_none());
    }

    #[test]
    fn test_json_form_uses_text_fields() {
        let form = FormData::new().text("a", "1");
        let encoded = Body::from(form).encode(content_type::JSON).unwrap();
        assert_eq!(bytes_of(&encoded), br#"{"a":"1"}"#);

        let with_file = FormData::new().file("f", "f.bin", None, vec![1]);
        assert!(Body::from(with_file).encode(content_type::JSON).is_err());
    }

    #[test]
    fn test_multipart_passes_form_and_omits_header() {
        let form = FormData::new().text("a", "1");
        let encoded = Body::from(form.clone()).encode(content_type::MULTIPART).unwrap();
        assert_eq!(encoded.content_type, None);
        assert_eq!(encoded.body, Some(RequestBody::Multipart(form)));
    }

    #[test]
    fn test_urlencoded_object() {
        let encoded = Body::from(json!({ "a": "1" }))
            .encode(content_type::FORM_URLENCODED)
            .unwrap();
        assert_eq!(
            encoded.content_type.as_deref(),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(bytes_of(&encoded), b"a=1");
    }

    #[test]
    fn test_urlencoded_escapes_and_stringifies() {
        let encoded = Body::from(json!({ "q": "a b&c", "n": 2, "ok": true }))
            .encode(content_type::FORM_URLENCODED)
            .unwrap();
        let text = String::from_utf8(bytes_of(&encoded).to_vec()).unwrap();
        assert!(text.contains("q=a+b%26c"));
        assert!(text.contains("n=2"));
        assert!(text.contains("ok=true"));
    }

    #[test]
    fn test_urlencoded_reencodes_query_string() {
        let encoded = Body::from("?x=1&y=two words")
            .encode(content_type::FORM_URLENCODED)
            .unwrap();
        assert_eq!(bytes_of(&encoded), b"x=1&y=two+words");
    }

    #[test]
    fn test_urlencoded_rejects_arrays() {
        let error = Body::from(json!([1, 2]))
            .encode(content_type::FORM_URLENCODED)
            .unwrap_err();
        assert!(error.message.contains("an array"));
    }

    #[test]
    fn test_other_content_type_is_literal() {
        let encoded = Body::from("<a/>").encode("application/xml").unwrap();
        assert_eq!(encoded.content_type.as_deref(), Some("application/xml"));
        assert_eq!(bytes_of(&encoded), b"<a/>");
    }

    #[test]
    fn test_content_type_match_ignores_case() {
        let encoded = Body::from(json!({})).encode("Application/JSON").unwrap();
        assert_eq!(encoded.content_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_body_json_helper() {
        #[derive(Serialize)]
        struct Todo {
            title: &'static str,
        }
        let body = Body::json(&Todo { title: "x" }).unwrap();
        assert_eq!(body, Body::Json(json!({ "title": "x" })));
    }
}
