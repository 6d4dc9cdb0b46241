//! Mutation binding: write requests with a published submitting flag.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::watch;

use crate::client::{Body, CacheFetcher, MutationResult, Payload, RequestOptions};
use crate::error::RequestError;

/// State published by a [`MutationBinding`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationState {
    pub data: Option<Payload>,
    pub is_submitting: bool,
    pub error: Option<RequestError>,
}

impl MutationState {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Runs write requests and publishes their progress and outcome.
///
/// Every trigger sets `is_submitting` and clears `error` before the request,
/// then mirrors the envelope and resets `is_submitting` once it completes.
pub struct MutationBinding {
    fetcher: CacheFetcher,
    state: watch::Sender<MutationState>,
}

impl MutationBinding {
    pub fn new(fetcher: CacheFetcher) -> Self {
        let (state, _) = watch::channel(MutationState::default());
        Self { fetcher, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }

    pub async fn post(
        &self,
        url: &str,
        body: impl Into<Body>,
        content_type: &str,
        options: &RequestOptions,
    ) -> MutationResult {
        let body = body.into();
        self.run(self.fetcher.post(url, body, content_type, options))
            .await
    }

    pub async fn put(
        &self,
        url: &str,
        body: impl Into<Body>,
        content_type: &str,
        options: &RequestOptions,
    ) -> MutationResult {
        let body = body.into();
        self.run(self.fetcher.put(url, body, content_type, options))
            .await
    }

    pub async fn patch(
        &self,
        url: &str,
        body: impl Into<Body>,
        content_type: &str,
        options: &RequestOptions,
    ) -> MutationResult {
        let body = body.into();
        self.run(self.fetcher.patch(url, body, content_type, options))
            .await
    }

    pub async fn delete(&self, url: &str, options: &RequestOptions) -> MutationResult {
        self.run(self.fetcher.delete(url, options)).await
    }

    async fn run<F>(&self, operation: F) -> MutationResult
    where
        F: Future<Output = MutationResult>,
    {
        self.state.send_modify(|state| {
            state.is_submitting = true;
            state.error = None;
        });

        let result = match AssertUnwindSafe(operation).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(message = %message, "Mutation panicked");
                MutationResult::failure(RequestError::transport(message))
            }
        };

        self.state.send_modify(|state| {
            state.data = result.data.clone();
            state.error = result.error.clone();
            state.is_submitting = false;
        });
        result
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "mutation panicked".to_string()
    }
}

impl std::fmt::Debug for MutationBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationBinding")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::Method;
    use serde_json::json;

    use super::*;
    use crate::client::content_type;
    use crate::transport::scripted::{ScriptedTransport, json_ok, transport_error};

    const URL: &str = "https://api.test/todos";

    fn setup() -> (Arc<ScriptedTransport>, MutationBinding) {
        let transport = Arc::new(ScriptedTransport::new());
        let binding = MutationBinding::new(CacheFetcher::with_memory_cache(transport.clone()));
        (transport, binding)
    }

    #[tokio::test]
    async fn test_submitting_flag_is_published_first() {
        let (transport, binding) = setup();
        transport.on(Method::DELETE, URL, json_ok("{}"));
        let mut probe = binding.subscribe();
        let mut during = false;

        binding
            .run(async {
                during = probe.borrow_and_update().is_submitting;
                binding.fetcher.delete(URL, &RequestOptions::default()).await
            })
            .await;

        assert!(during);
        assert!(!probe.borrow_and_update().is_submitting);
    }

    #[test]
    fn test_initial_state() {
        let (_transport, binding) = setup();
        assert_eq!(binding.state(), MutationState::default());
        assert!(!binding.state().is_submitting);
    }

    #[tokio::test]
    async fn test_post_publishes_data() {
        let (transport, binding) = setup();
        transport.on(Method::POST, URL, json_ok(r#"{"id":101}"#));
        let mut receiver = binding.subscribe();

        let result = binding
            .post(URL, json!({ "title": "x" }), content_type::JSON, &RequestOptions::default())
            .await;

        assert!(!result.is_error);
        let state = receiver.borrow_and_update().clone();
        assert!(!state.is_submitting);
        assert_eq!(state.data, Some(Payload::Json(json!({ "id": 101 }))));
        assert!(!state.is_error());
    }

    #[tokio::test]
    async fn test_failure_is_published() {
        let (transport, binding) = setup();
        transport.on(Method::PUT, URL, transport_error("connection refused"));

        binding
            .put(URL, "x", "text/plain", &RequestOptions::default())
            .await;

        let state = binding.state();
        assert!(!state.is_submitting);
        assert!(state.data.is_none());
        assert_eq!(state.error.unwrap().message, "connection refused");
    }

    #[tokio::test]
    async fn test_next_trigger_clears_error() {
        let (transport, binding) = setup();
        binding.delete(URL, &RequestOptions::default()).await;
        assert!(binding.state().is_error());

        transport.on(Method::PATCH, URL, json_ok("{}"));
        binding
            .patch(URL, json!({}), content_type::JSON, &RequestOptions::default())
            .await;
        assert!(!binding.state().is_error());
    }

    #[tokio::test]
    async fn test_panic_is_mirrored_into_error() {
        let (_transport, binding) = setup();

        async fn explode() -> MutationResult {
            panic!("boom")
        }
        let result = binding.run(explode()).await;

        assert!(result.is_error);
        let state = binding.state();
        assert!(!state.is_submitting);
        assert_eq!(state.error.unwrap().message, "boom");
    }
}
