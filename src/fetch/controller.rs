//! URL-driven fetch controller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinSet;

use super::{FetchAction, FetchError, FetchState, Fetcher};

/// State shared between the controller and its in-flight requests.
///
/// `generation` names the only request whose result may still be applied.
/// It is advanced on every new request and on drop; a request compares its
/// own generation against it under the same lock that guards the update.
#[derive(Debug)]
struct Shared<T> {
    generation: Mutex<u64>,
    state: watch::Sender<FetchState<T>>,
}

impl<T> Shared<T> {
    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new generation and move to the loading state.
    fn begin(&self) -> u64 {
        let mut generation = self.lock_generation();
        *generation += 1;
        self.state.send_modify(|state| state.apply(FetchAction::Init));
        *generation
    }

    /// Apply `action` if `generation` is still current.
    fn dispatch(&self, generation: u64, action: FetchAction<T>) -> bool {
        let current = self.lock_generation();
        if *current != generation {
            return false;
        }
        self.state.send_modify(|state| state.apply(action));
        true
    }

    fn cancel(&self) {
        *self.lock_generation() += 1;
    }
}

/// Fetch controller keyed on a URL.
///
/// Construction issues the first request. [`set_url`](Self::set_url) issues a
/// new one whenever the URL actually changes; the previous request keeps
/// running but its outcome is dropped. Dropping the controller suppresses
/// every outstanding result.
#[derive(Debug)]
pub struct DataApi<T> {
    url: String,
    fetcher: Arc<dyn Fetcher>,
    shared: Arc<Shared<T>>,
    tasks: JoinSet<()>,
}

impl<T> DataApi<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Create a controller and start fetching `initial_url`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(initial_url: impl Into<String>, initial_data: T, fetcher: Arc<dyn Fetcher>) -> Self {
        let (state, _) = watch::channel(FetchState::new(initial_data));
        let mut api = Self {
            url: initial_url.into(),
            fetcher,
            shared: Arc::new(Shared {
                generation: Mutex::new(0),
                state,
            }),
            tasks: JoinSet::new(),
        };
        api.issue();
        api
    }

    /// The URL of the latest request
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Borrow the current state.
    ///
    /// The borrow blocks state updates; do not hold it across an `.await`.
    pub fn state(&self) -> watch::Ref<'_, FetchState<T>> {
        self.shared.state.borrow()
    }

    /// Receive a notification on every state transition
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.shared.state.subscribe()
    }

    /// Point the controller at a new URL.
    ///
    /// Returns `false` and does nothing if `url` equals the current one.
    pub fn set_url(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if url == self.url {
            return false;
        }
        self.url = url;
        self.issue();
        true
    }

    /// Re-issue the current URL unconditionally
    pub fn refetch(&mut self) {
        self.issue();
    }

    /// Wait for every outstanding request, superseded ones included, to finish.
    pub async fn drain(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(err) = joined {
                if err.is_panic() {
                    tracing::error!("Fetch task panicked: {}", err);
                }
            }
        }
    }

    fn issue(&mut self) {
        while self.tasks.try_join_next().is_some() {}

        let generation = self.shared.begin();
        let shared = Arc::clone(&self.shared);
        let fetcher = Arc::clone(&self.fetcher);
        let url = self.url.clone();

        tracing::debug!(%url, generation, "Issuing request");

        self.tasks.spawn(async move {
            let outcome = fetcher
                .get(&url)
                .await
                .and_then(|body| serde_json::from_str::<T>(&body).map_err(FetchError::from));

            let (action, error) = match outcome {
                Ok(data) => (FetchAction::Success(data), None),
                Err(err) => (FetchAction::Failure, Some(err)),
            };

            if !shared.dispatch(generation, action) {
                tracing::debug!(%url, generation, "Discarding stale response");
                return;
            }

            match error {
                Some(err) => tracing::warn!(%url, "Fetch failed: {}", err),
                None => tracing::debug!(%url, generation, "Fetch succeeded"),
            }
        });
    }
}

impl<T> DataApi<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Wait until the latest request has been applied and return the state.
    pub async fn settled(&self) -> FetchState<T> {
        let mut rx = self.shared.state.subscribe();
        let settled = match rx.wait_for(|state| !state.is_loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state().clone(),
        };
        settled
    }
}

impl<T> Drop for DataApi<T> {
    fn drop(&mut self) {
        self.shared.cancel();
    }
}
