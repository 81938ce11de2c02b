//! Core data models for catalog searches.

mod book;
mod search;

pub use book::{BookDoc, SearchResult};
pub use search::{SearchQuery, DEFAULT_QUERY, DEFAULT_SORT, OPEN_LIBRARY_BASE};
