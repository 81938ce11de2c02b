//! Asynchronous data fetching with loading/error/data state.
//!
//! A [`DataApi`] owns a target URL and a [`FetchState`]. Every time the URL
//! changes it moves to the loading state and issues one GET through its
//! [`Fetcher`]. Responses from requests that were superseded, or that
//! complete after the controller was dropped, are discarded.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use book_finder::fetch::DataApi;
//! use book_finder::models::SearchResult;
//! use book_finder::utils::HttpClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(HttpClient::new("book-finder", std::time::Duration::from_secs(30))?);
//! let mut api = DataApi::new(
//!     "https://openlibrary.org/search.json?author=tolkien&sort=new",
//!     SearchResult::default(),
//!     client,
//! );
//! let state = api.settled().await;
//! println!("{} records", state.data.docs.len());
//! # api.set_url("https://openlibrary.org/search.json?author=le+guin&sort=new");
//! # Ok(())
//! # }
//! ```

mod controller;
mod scripted;

pub use controller::DataApi;
pub use scripted::ScriptedFetcher;

use async_trait::async_trait;
use serde::Serialize;

/// Snapshot of the latest request's progress plus the last good data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchState<T> {
    pub is_loading: bool,
    pub is_error: bool,
    pub data: T,
}

impl<T> FetchState<T> {
    /// Idle state holding `data`
    pub fn new(data: T) -> Self {
        Self {
            is_loading: false,
            is_error: false,
            data,
        }
    }

    /// Apply a transition in place.
    pub fn apply(&mut self, action: FetchAction<T>) {
        match action {
            FetchAction::Init => {
                self.is_loading = true;
                self.is_error = false;
            }
            FetchAction::Success(data) => {
                self.is_loading = false;
                self.is_error = false;
                self.data = data;
            }
            FetchAction::Failure => {
                self.is_loading = false;
                self.is_error = true;
            }
        }
    }

    /// Pure reducer form of [`apply`](Self::apply)
    pub fn reduce(mut self, action: FetchAction<T>) -> Self {
        self.apply(action);
        self
    }

    /// Which phase the latest transition left the state in
    pub fn phase(&self) -> FetchPhase {
        match (self.is_loading, self.is_error) {
            (true, _) => FetchPhase::Loading,
            (false, true) => FetchPhase::Failed,
            (false, false) => FetchPhase::Ready,
        }
    }
}

/// Transitions accepted by [`FetchState::apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAction<T> {
    /// A request was issued
    Init,
    /// The request completed with a decoded body
    Success(T),
    /// The request failed for any reason
    Failure,
}

/// Coarse view of a [`FetchState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Loading,
    Ready,
    Failed,
}

/// Transport used by [`DataApi`] to perform a GET.
#[async_trait]
pub trait Fetcher: Send + Sync + std::fmt::Debug {
    /// Fetch `url` and return the response body.
    ///
    /// Non-success statuses must be reported as errors.
    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Errors that can occur while fetching
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or body read failure
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    /// The body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(format!("JSON: {}", err))
    }
}
