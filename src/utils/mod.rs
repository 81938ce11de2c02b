//! Utility modules supporting catalog searches.
//!
//! - [`HttpClient`]: reqwest-backed [`Fetcher`](crate::fetch::Fetcher)
//! - [`truncate_with_ellipsis`]: unicode-aware truncation for table cells
//! - [`terminal_width`] and [`is_terminal`]: terminal capabilities
//!
//! # HTTP Client
//!
//! ```rust,no_run
//! use book_finder::fetch::Fetcher;
//! use book_finder::utils::{HttpClient, DEFAULT_USER_AGENT};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(DEFAULT_USER_AGENT, Duration::from_secs(30))?;
//! let body = client
//!     .get("https://openlibrary.org/search.json?author=tolkien&sort=new")
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod display;
mod http;

pub use display::{is_terminal, terminal_width, truncate_with_ellipsis, DEFAULT_WIDTH};
pub use http::{HttpClient, DEFAULT_USER_AGENT};
