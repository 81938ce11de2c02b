//! In-memory fetcher for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Mutex;
use tokio::sync::oneshot;

use super::{FetchError, Fetcher};

type Reply = Result<String, FetchError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// A fetcher that answers from a per-URL script.
///
/// Each URL holds a queue of replies consumed in order. A gated reply stays
/// pending until the test sends through the returned channel, which makes
/// the completion order of overlapping requests controllable.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful body for `url`
    pub fn respond(&self, url: &str, body: impl Into<String>) {
        self.push(url, Scripted::Ready(Ok(body.into())));
    }

    /// Queue a failure for `url`
    pub fn fail(&self, url: &str, error: FetchError) {
        self.push(url, Scripted::Ready(Err(error)));
    }

    /// Queue a reply for `url` that resolves when the sender is used
    pub fn gate(&self, url: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(url, Scripted::Gated(rx));
        tx
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, url: &str, reply: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }
}

impl fmt::Debug for ScriptedFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedFetcher")
            .field("requests", &self.requests())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        let next = self
            .routes
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Network("gate closed".to_string()))),
            None => Err(FetchError::Status(404)),
        }
    }
}
