//! Query binding: a GET whose result is published on a watch channel.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;

use crate::client::{CacheFetcher, Payload, QueryResult, RequestOptions};
use crate::error::RequestError;

/// State published by a [`QueryBinding`]
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub data: Option<Payload>,
    pub is_loading: bool,
    pub error: Option<RequestError>,
}

impl QueryState {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl Default for QueryState {
    /// Nothing fetched yet, so the binding starts out loading
    fn default() -> Self {
        Self {
            data: None,
            is_loading: true,
            error: None,
        }
    }
}

impl From<QueryResult> for QueryState {
    fn from(result: QueryResult) -> Self {
        Self {
            data: result.data,
            is_loading: result.is_loading,
            error: result.error,
        }
    }
}

#[derive(Default)]
struct Dependencies {
    current: Option<(String, RequestOptions)>,
    /// Bumped on every fetch; only the newest fetch may publish
    generation: u64,
}

/// Keeps the result of `get(url, options)` published for subscribers.
///
/// [`watch`](Self::watch) fetches only when the `(url, options)` pair
/// differs from the previous call. When the pair changes while a fetch is
/// still running, the stale result is dropped instead of overwriting the
/// newer one.
pub struct QueryBinding {
    fetcher: CacheFetcher,
    state: watch::Sender<QueryState>,
    deps: Mutex<Dependencies>,
}

impl QueryBinding {
    pub fn new(fetcher: CacheFetcher) -> Self {
        let (state, _) = watch::channel(QueryState::default());
        Self {
            fetcher,
            state,
            deps: Mutex::new(Dependencies::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    /// Point the binding at `(url, options)`.
    ///
    /// Returns `false` without fetching when the pair equals the previous one.
    pub async fn watch(&self, url: &str, options: &RequestOptions) -> bool {
        let generation = {
            let mut deps = self.lock_deps();
            let unchanged = deps
                .current
                .as_ref()
                .is_some_and(|(current_url, current_options)| {
                    current_url == url && current_options == options
                });
            if unchanged {
                tracing::debug!(url, "Query dependencies unchanged, skipping fetch");
                return false;
            }
            deps.current = Some((url.to_string(), options.clone()));
            deps.generation += 1;
            deps.generation
        };

        self.run(generation, url, options).await;
        true
    }

    /// Fetch again with the current dependencies.
    ///
    /// Returns `false` when [`watch`](Self::watch) has never been called.
    pub async fn refresh(&self) -> bool {
        let (generation, url, options) = {
            let mut deps = self.lock_deps();
            let Some((url, options)) = deps.current.clone() else {
                return false;
            };
            deps.generation += 1;
            (deps.generation, url, options)
        };

        self.run(generation, &url, &options).await;
        true
    }

    async fn run(&self, generation: u64, url: &str, options: &RequestOptions) {
        self.state.send_modify(|state| state.is_loading = true);

        let result = self.fetcher.get(url, options).await;

        if self.lock_deps().generation != generation {
            tracing::debug!(url, "Dropping stale query result");
            return;
        }
        self.state.send_replace(QueryState::from(result));
    }

    fn lock_deps(&self) -> MutexGuard<'_, Dependencies> {
        // The guarded data stays consistent even if a holder panicked
        self.deps.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for QueryBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBinding")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
