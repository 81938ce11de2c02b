//! Search result payloads returned by the Open Library search endpoint.

use serde::{Deserialize, Serialize};

const GOOGLE_SEARCH_BASE: &str = "https://www.google.com/search?q=";

/// Characters a URI component may carry unescaped beyond `A-Z a-z 0-9 - _ . ~`
const COMPONENT_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encode `text` as a URI component, leaving `!'()*` as-is.
fn encode_component(text: &str) -> String {
    COMPONENT_MARKS
        .iter()
        .fold(urlencoding::encode(text).into_owned(), |encoded, (escape, mark)| {
            encoded.replace(escape, mark)
        })
}

/// Body of a `search.json` response.
///
/// Only the fields the result list needs are modelled; anything else in the
/// payload is ignored during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matching records, in the order the API returned them
    #[serde(default)]
    pub docs: Vec<BookDoc>,

    /// Total hit count reported by the API
    #[serde(
        default,
        rename = "numFound",
        skip_serializing_if = "Option::is_none"
    )]
    pub num_found: Option<u64>,
}

impl SearchResult {
    /// Create a result from a list of records
    pub fn new(docs: Vec<BookDoc>) -> Self {
        Self {
            docs,
            num_found: None,
        }
    }

    /// Whether the result holds no records
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// A single catalog record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDoc {
    /// Work key, e.g. `/works/OL27482W`
    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub author_name: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<u32>,
}

impl BookDoc {
    /// Create a record with a key, title and author list
    pub fn new(key: impl Into<String>, title: impl Into<String>, authors: &[&str]) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            author_name: authors.iter().map(|a| a.to_string()).collect(),
            first_publish_year: None,
        }
    }

    /// Author names joined for display
    pub fn authors(&self) -> String {
        self.author_name.join(", ")
    }

    /// Web search link for this record.
    ///
    /// The query is the title followed by the author names joined with `,`,
    /// percent-encoded as a single component.
    pub fn google_link(&self) -> String {
        let authors = self.author_name.join(",");
        let terms = if authors.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, authors)
        };
        format!("{}{}", GOOGLE_SEARCH_BASE, encode_component(&terms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search_response() {
        let body = r#"{
            "numFound": 2,
            "start": 0,
            "docs": [
                {"key": "/works/OL27482W", "title": "The Hobbit", "author_name": ["J.R.R. Tolkien"], "first_publish_year": 1937},
                {"key": "/works/OL1W", "title": "Untitled"}
            ]
        }"#;

        let result: SearchResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.num_found, Some(2));
        assert_eq!(result.docs.len(), 2);
        assert_eq!(result.docs[0].title, "The Hobbit");
        assert_eq!(result.docs[0].first_publish_year, Some(1937));
        assert!(result.docs[1].author_name.is_empty());
    }

    #[test]
    fn test_missing_docs_is_empty() {
        let result: SearchResult = serde_json::from_str("{}").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_google_link_encodes_title_and_authors() {
        let doc = BookDoc::new("/works/1", "The Hobbit", &["J.R.R. Tolkien", "Alan Lee"]);
        assert_eq!(
            doc.google_link(),
            "https://www.google.com/search?q=The%20Hobbit%20J.R.R.%20Tolkien%2CAlan%20Lee"
        );
    }

    #[test]
    fn test_google_link_keeps_component_marks() {
        let doc = BookDoc::new("/works/4", "The Hobbit (Illustrated)", &["Tolkien"]);
        assert_eq!(
            doc.google_link(),
            "https://www.google.com/search?q=The%20Hobbit%20(Illustrated)%20Tolkien"
        );

        let doc = BookDoc::new("/works/5", "Don't Panic! *50%*", &[]);
        assert_eq!(
            doc.google_link(),
            "https://www.google.com/search?q=Don't%20Panic!%20*50%25*"
        );
    }

    #[test]
    fn test_google_link_without_authors() {
        let doc = BookDoc::new("/works/2", "Beowulf", &[]);
        assert_eq!(doc.google_link(), "https://www.google.com/search?q=Beowulf");
    }

    #[test]
    fn test_authors_display() {
        let doc = BookDoc::new("/works/3", "Letters", &["J.R.R. Tolkien", "Humphrey Carpenter"]);
        assert_eq!(doc.authors(), "J.R.R. Tolkien, Humphrey Carpenter");
    }
}
