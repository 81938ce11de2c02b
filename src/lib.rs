//! # Book Finder
//!
//! A terminal search client for the Open Library catalog with client-side
//! pagination.
//!
//! ## Architecture
//!
//! - [`fetch`]: URL-driven fetch controller with loading/error/data state
//! - [`pagination`]: page slicing, page ranges and the page button control
//! - [`models`]: search query and result payloads
//! - [`app`]: the search view bound to user commands
//! - [`ui`]: terminal rendering of the view
//! - [`utils`]: HTTP client and display helpers
//! - [`config`]: configuration management

pub mod app;
pub mod config;
pub mod fetch;
pub mod models;
pub mod pagination;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use fetch::{DataApi, FetchState, Fetcher};
pub use models::{BookDoc, SearchResult};
pub use pagination::{paginate, range, PageState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
