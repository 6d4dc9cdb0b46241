//! Cache-backed HTTP client.

use std::sync::Arc;

use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method};

use crate::cache::{MemoryCache, ResponseCache};
use crate::client::{
    Body, HeadResult, MutationResult, OptionsResult, Payload, QueryResult, RequestOptions,
};
use crate::error::{RequestError, RequestResult};
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// HTTP client with a URL-keyed cache for GET responses.
///
/// Both collaborators are injected: the [`Transport`] that performs the
/// requests and the [`ResponseCache`] that stores decoded GET bodies.
/// Cloning is cheap and clones share both.
///
/// Consistency contract:
/// - a successful GET stores its decoded body under the exact URL string
/// - a later GET to that URL is answered from the cache, without revalidation
/// - any POST, PUT, PATCH or DELETE to that URL removes the entry, whether
///   or not the request succeeded
/// - HEAD and OPTIONS never touch the cache
///
/// There is no de-duplication: two concurrent GETs for an uncached URL both
/// reach the network and the one that finishes last wins the cache slot.
///
/// # Example
/// ```ignore
/// let fetcher = CacheFetcher::with_memory_cache(default_transport()?);
///
/// let todo = fetcher
///     .get("https://jsonplaceholder.typicode.com/todos/1", &RequestOptions::default())
///     .await;
/// if let Some(data) = todo.data {
///     println!("{:?}", data);
/// }
/// ```
#[derive(Clone)]
pub struct CacheFetcher {
    transport: Arc<dyn Transport>,
    cache: Arc<dyn ResponseCache>,
}

impl CacheFetcher {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<dyn ResponseCache>) -> Self {
        Self { transport, cache }
    }

    /// Client with a fresh, private [`MemoryCache`]
    pub fn with_memory_cache(transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, Arc::new(MemoryCache::new()))
    }

    /// Client built from loaded settings: reqwest transport and the configured cache
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_settings(settings: &crate::config::settings::Settings) -> RequestResult<Self> {
        let transport = crate::transport::ReqwestTransport::new(&settings.client)?;
        Ok(Self::new(
            Arc::new(transport),
            crate::cache::cache_from_config(&settings.cache),
        ))
    }

    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        &self.cache
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Fetch `url` with GET, answering from the cache when possible
    pub async fn get(&self, url: &str, options: &RequestOptions) -> QueryResult {
        match self.cache.get(url).await {
            Ok(Some(data)) => {
                tracing::debug!(url, "Cache hit");
                return QueryResult::success(data);
            }
            Ok(None) => tracing::debug!(url, "Cache miss"),
            Err(e) => tracing::warn!(url, error = %e, "Cache read failed, fetching from network"),
        }

        let outcome = self
            .dispatch(HttpRequest::new(Method::GET, url), options)
            .await
            .and_then(|response| Payload::decode(&response.headers, &response.body));

        match outcome {
            Ok(data) => {
                if let Err(e) = self.cache.set(url, data.clone()).await {
                    tracing::warn!(url, error = %e, "Failed to store response in cache");
                }
                QueryResult::success(data)
            }
            Err(error) => {
                tracing::warn!(url, error = %error, "GET request failed");
                QueryResult::failure(error)
            }
        }
    }

    /// Send `body` with POST and invalidate `url`
    pub async fn post(
        &self,
        url: &str,
        body: impl Into<Body>,
        content_type: &str,
        options: &RequestOptions,
    ) -> MutationResult {
        self.submit(Method::POST, url, body.into(), content_type, options)
            .await
    }

    /// Send `body` with PUT and invalidate `url`
    pub async fn put(
        &self,
        url: &str,
        body: impl Into<Body>,
        content_type: &str,
        options: &RequestOptions,
    ) -> MutationResult {
        self.submit(Method::PUT, url, body.into(), content_type, options)
            .await
    }

    /// Send `body` with PATCH and invalidate `url`
    pub async fn patch(
        &self,
        url: &str,
        body: impl Into<Body>,
        content_type: &str,
        options: &RequestOptions,
    ) -> MutationResult {
        self.submit(Method::PATCH, url, body.into(), content_type, options)
            .await
    }

    /// Send DELETE and invalidate `url`
    pub async fn delete(&self, url: &str, options: &RequestOptions) -> MutationResult {
        let outcome = self
            .dispatch(HttpRequest::new(Method::DELETE, url), options)
            .await
            .and_then(|response| Payload::decode(&response.headers, &response.body));
        self.finish_mutation(Method::DELETE, url, outcome).await
    }

    /// Fetch status and headers with HEAD; the cache is not consulted
    pub async fn head(&self, url: &str, options: &RequestOptions) -> HeadResult {
        match self
            .dispatch(HttpRequest::new(Method::HEAD, url), options)
            .await
        {
            Ok(response) => HeadResult::success(response.status, &response.headers),
            Err(error) => {
                tracing::warn!(url, error = %error, "HEAD request failed");
                HeadResult::failure(error)
            }
        }
    }

    /// Fetch the server's advertised capabilities with OPTIONS; the cache is not consulted
    pub async fn options(&self, url: &str, options: &RequestOptions) -> OptionsResult {
        let outcome = self
            .dispatch(HttpRequest::new(Method::OPTIONS, url), options)
            .await
            .and_then(|response| Payload::decode(&response.headers, &response.body));

        match outcome {
            Ok(capabilities) => OptionsResult::success(capabilities),
            Err(error) => {
                tracing::warn!(url, error = %error, "OPTIONS request failed");
                OptionsResult::failure(error)
            }
        }
    }

    /// Remove `url` from the cache, returning whether an entry was removed
    pub async fn invalidate(&self, url: &str) -> bool {
        match self.cache.remove(url).await {
            Ok(removed) => {
                if removed.is_some() {
                    tracing::debug!(url, "Invalidated cache entry");
                }
                removed.is_some()
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "Failed to invalidate cache entry");
                false
            }
        }
    }

    /// Drop every cached response
    pub async fn clear_cache(&self) {
        if let Err(e) = self.cache.clear().await {
            tracing::warn!(error = %e, "Failed to clear cache");
        }
    }

    pub async fn is_cached(&self, url: &str) -> bool {
        self.cache.contains(url).await.unwrap_or(false)
    }

    async fn submit(
        &self,
        method: Method,
        url: &str,
        body: Body,
        content_type: &str,
        options: &RequestOptions,
    ) -> MutationResult {
        let outcome = self
            .send_body(method.clone(), url, body, content_type, options)
            .await;
        self.finish_mutation(method, url, outcome).await
    }

    async fn send_body(
        &self,
        method: Method,
        url: &str,
        body: Body,
        content_type: &str,
        options: &RequestOptions,
    ) -> RequestResult<Payload> {
        let encoded = body.encode(content_type)?;

        let mut request = HttpRequest::new(method, url);
        if let Some(content_type) = encoded.content_type {
            let value = HeaderValue::from_str(&content_type).map_err(|e| {
                RequestError::transport(format!("Invalid content type '{}': {}", content_type, e))
            })?;
            request.headers.insert(CONTENT_TYPE, value);
        }
        request.body = encoded.body;

        let response = self.dispatch(request, options).await?;
        Payload::decode(&response.headers, &response.body)
    }

    /// Invalidate `url` whatever the outcome, then build the envelope
    async fn finish_mutation(
        &self,
        method: Method,
        url: &str,
        outcome: RequestResult<Payload>,
    ) -> MutationResult {
        self.invalidate(url).await;

        match outcome {
            Ok(data) => MutationResult::success(data),
            Err(error) => {
                tracing::warn!(url, method = %method, error = %error, "Mutating request failed");
                MutationResult::failure(error)
            }
        }
    }

    /// Apply caller options, send, and turn non-2xx statuses into errors
    async fn dispatch(
        &self,
        mut request: HttpRequest,
        options: &RequestOptions,
    ) -> RequestResult<HttpResponse> {
        options.apply_headers(&mut request.headers)?;
        request.timeout = options.timeout;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            transport = self.transport.name(),
            "Sending request"
        );
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(RequestError::status(
                response.status,
                response.status_text.clone(),
            ));
        }
        Ok(response)
    }
}

impl std::fmt::Debug for CacheFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheFetcher")
            .field("transport", &self.transport.name())
            .finish_non_exhaustive()
    }
}
