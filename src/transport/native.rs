//! Native transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::{FormData, FormValue, HttpRequest, HttpResponse, RequestBody, Transport};
use crate::config::settings::ClientConfig;
use crate::error::{RequestError, RequestResult};

/// HTTP transport for server-side and desktop use.
///
/// Wraps a single `reqwest::Client`, so every request made through one
/// transport shares its connection pool, cookie store and DNS cache.
///
/// # Features
/// - **Compression**: gzip, deflate, brotli and zstd
/// - **HTTP/2**: adaptive window sizing and keep-alive
/// - **Timeouts**: whole-request and connect timeouts from [`ClientConfig`]
/// - **Security**: Rustls for TLS (no OpenSSL dependency)
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from client settings
    pub fn new(config: &ClientConfig) -> RequestResult<Self> {
        let client = reqwest::Client::builder()
            // Timeouts
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            // Connection pooling
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            // HTTP/2 settings
            .http2_adaptive_window(true)
            .http2_keep_alive_interval(Duration::from_secs(10))
            .http2_keep_alive_timeout(Duration::from_secs(20))
            // Enable compression (gzip, deflate, brotli, zstd)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .zstd(true)
            .cookie_store(config.cookie_store)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(RequestError::transport)?;

        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> RequestResult<HttpResponse> {
        let mut builder = self.client.request(request.method, &request.url);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match request.body {
            Some(RequestBody::Bytes(bytes)) => builder.body(bytes),
            Some(RequestBody::Multipart(form)) => builder.multipart(to_multipart(form)?),
            None => builder,
        };

        // `headers` replaces, so a caller Content-Type overrides the multipart one
        builder = builder.headers(request.headers);

        let response = builder.send().await.map_err(RequestError::transport)?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();
        let headers = response.headers().clone();

        // Fetch body. We don't do streaming
        let body = response
            .bytes()
            .await
            .map_err(RequestError::transport)?
            .to_vec();

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text,
            headers,
            body,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

fn to_multipart(form: FormData) -> RequestResult<Form> {
    let mut multipart = Form::new();
    for part in form.into_parts() {
        multipart = match part.value {
            FormValue::Text(value) => multipart.text(part.name, value),
            FormValue::File {
                file_name,
                mime,
                bytes,
            } => {
                let mut file = Part::bytes(bytes);
                if let Some(file_name) = file_name {
                    file = file.file_name(file_name);
                }
                if let Some(mime) = mime {
                    file = file.mime_str(&mime).map_err(RequestError::transport)?;
                }
                multipart.part(part.name, file)
            }
        };
    }
    Ok(multipart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Bytes;
    use axum::http::{HeaderMap as AxumHeaderMap, StatusCode};
    use axum::routing::{get, post};
    use http::Method;
    use http::header::CONTENT_TYPE;
    use serde_json::{Value, json};

    async fn echo(headers: AxumHeaderMap, body: Bytes) -> axum::Json<Value> {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        axum::Json(json!({
            "contentType": content_type,
            "contentTypeCount": headers.get_all(CONTENT_TYPE).iter().count(),
            "body": String::from_utf8_lossy(&body),
        }))
    }

    /// Start an in-process server and return its base URL
    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/todo", get(|| async { axum::Json(json!({ "id": 1 })) }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route("/echo", post(echo));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(&ClientConfig::default()).expect("Failed to build transport")
    }

    #[test]
    fn test_transport_initialization() {
        assert_eq!(transport().name(), "reqwest");
    }

    #[tokio::test]
    async fn test_get_buffers_response() {
        let base = spawn_server().await;
        let response = transport()
            .send(HttpRequest::new(Method::GET, format!("{}/todo", base)))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        assert!(
            response.headers[CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("application/json")
        );
        assert_eq!(response.body, br#"{"id":1}"#);
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let base = spawn_server().await;
        let response = transport()
            .send(HttpRequest::new(Method::GET, format!("{}/missing", base)))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.status_text, "Not Found");
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_multipart_sets_boundary() {
        let base = spawn_server().await;
        let mut request = HttpRequest::new(Method::POST, format!("{}/echo", base));
        request.body = Some(RequestBody::Multipart(FormData::new().text("a", "1")));

        let response = transport().send(request).await.unwrap();
        let echoed: Value = serde_json::from_slice(&response.body).unwrap();
        let content_type = echoed["contentType"].as_str().unwrap();

        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert!(echoed["body"].as_str().unwrap().contains("name=\"a\""));
    }

    #[tokio::test]
    async fn test_caller_content_type_replaces_multipart_header() {
        let base = spawn_server().await;
        let mut request = HttpRequest::new(Method::POST, format!("{}/echo", base));
        request
            .headers
            .insert(CONTENT_TYPE, http::HeaderValue::from_static("multipart/mixed"));
        request.body = Some(RequestBody::Multipart(FormData::new().text("a", "1")));

        let response = transport().send(request).await.unwrap();
        let echoed: Value = serde_json::from_slice(&response.body).unwrap();

        assert_eq!(echoed["contentTypeCount"], 1);
        assert_eq!(echoed["contentType"], "multipart/mixed");
    }

    #[tokio::test]
    async fn test_caller_content_type_replaces_bytes_header() {
        let base = spawn_server().await;
        let mut request = HttpRequest::new(Method::POST, format!("{}/echo", base));
        request
            .headers
            .insert(CONTENT_TYPE, http::HeaderValue::from_static("text/csv"));
        request.body = Some(RequestBody::Bytes(b"a,b".to_vec()));

        let response = transport().send(request).await.unwrap();
        let echoed: Value = serde_json::from_slice(&response.body).unwrap();

        assert_eq!(echoed["contentTypeCount"], 1);
        assert_eq!(echoed["contentType"], "text/csv");
        assert_eq!(echoed["body"], "a,b");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let error = transport()
            .send(HttpRequest::new(Method::GET, format!("http://{}/", addr)))
            .await
            .unwrap_err();
        assert_eq!(error.status, None);
        assert!(!error.message.is_empty());
    }
}
