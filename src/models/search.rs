//! Search request model and URL construction.

use serde::{Deserialize, Serialize};
use url::Url;

/// Public Open Library host
pub const OPEN_LIBRARY_BASE: &str = "https://openlibrary.org";

/// Sort mode sent with every author search
pub const DEFAULT_SORT: &str = "new";

/// Author searched when no query is given
pub const DEFAULT_QUERY: &str = "tolkien";

/// An author search against the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Author name as typed by the user
    pub author: String,

    /// Sort mode understood by the search endpoint
    pub sort: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY)
    }
}

impl SearchQuery {
    /// Create a query for an author with the default sort
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            sort: DEFAULT_SORT.to_string(),
        }
    }

    /// Set the sort mode
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    /// Build the `search.json` URL under `base`
    pub fn url(&self, base: &str) -> Result<String, url::ParseError> {
        let endpoint = format!("{}/search.json", base.trim_end_matches('/'));
        let url = Url::parse_with_params(
            &endpoint,
            &[("author", self.author.as_str()), ("sort", self.sort.as_str())],
        )?;
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_url() {
        let url = SearchQuery::default().url(OPEN_LIBRARY_BASE).unwrap();
        assert_eq!(
            url,
            "https://openlibrary.org/search.json?author=tolkien&sort=new"
        );
    }

    #[test]
    fn test_query_is_encoded() {
        let url = SearchQuery::new("ursula k. le guin")
            .url("http://localhost:8080/")
            .unwrap();
        assert_eq!(
            url,
            "http://localhost:8080/search.json?author=ursula+k.+le+guin&sort=new"
        );
    }

    #[test]
    fn test_custom_sort() {
        let url = SearchQuery::new("pratchett")
            .sort("old")
            .url(OPEN_LIBRARY_BASE)
            .unwrap();
        assert!(url.ends_with("author=pratchett&sort=old"));
    }

    #[test]
    fn test_invalid_base() {
        assert!(SearchQuery::default().url("not a url").is_err());
    }
}
