//! Integration tests for Book Finder
//!
//! These tests run the HTTP client and the search view against a local
//! mock of the Open Library search endpoint.

use book_finder::app::{visible_docs, App, Command, Outcome};
use book_finder::config::Config;
use book_finder::fetch::{DataApi, FetchError, Fetcher};
use book_finder::models::{SearchQuery, SearchResult};
use book_finder::utils::{HttpClient, DEFAULT_USER_AGENT};
use mockito::Matcher;
use std::sync::Arc;
use std::time::Duration;

fn client() -> Arc<HttpClient> {
    Arc::new(HttpClient::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap())
}

fn author_query(author: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("author".into(), author.into()),
        Matcher::UrlEncoded("sort".into(), "new".into()),
    ])
}

fn docs_body(count: usize) -> String {
    let docs: Vec<String> = (1..=count)
        .map(|i| {
            format!(
                r#"{{"key": "/works/OL{i}W", "title": "Tale {i}", "author_name": ["J.R.R. Tolkien"]}}"#
            )
        })
        .collect();
    format!(
        r#"{{"numFound": {count}, "start": 0, "docs": [{}]}}"#,
        docs.join(",")
    )
}

fn config_for(server: &mockito::Server) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.url();
    config
}

#[tokio::test]
async fn test_http_client_returns_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search.json")
        .match_query(author_query("tolkien"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(docs_body(2))
        .create_async()
        .await;

    let url = SearchQuery::new("tolkien").url(&server.url()).unwrap();
    let body = client().get(&url).await.unwrap();
    let result: SearchResult = serde_json::from_str(&body).unwrap();

    assert_eq!(result.docs.len(), 2);
    assert_eq!(result.num_found, Some(2));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_client_reports_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/search.json")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let url = SearchQuery::new("tolkien").url(&server.url()).unwrap();
    let err = client().get(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Status(503)));
}

#[tokio::test]
async fn test_controller_against_server() {
    let mut server = mockito::Server::new_async().await;
    let _ok = server
        .mock("GET", "/search.json")
        .match_query(author_query("tolkien"))
        .with_status(200)
        .with_body(docs_body(3))
        .create_async()
        .await;
    let _broken = server
        .mock("GET", "/search.json")
        .match_query(author_query("broken"))
        .with_status(200)
        .with_body("{not json")
        .create_async()
        .await;

    let good = SearchQuery::new("tolkien").url(&server.url()).unwrap();
    let bad = SearchQuery::new("broken").url(&server.url()).unwrap();

    let mut api = DataApi::new(good, SearchResult::default(), client());
    let state = api.settled().await;
    assert!(!state.is_error);
    assert_eq!(state.data.docs.len(), 3);

    api.set_url(bad);
    let state = api.settled().await;
    assert!(state.is_error);
    assert_eq!(state.data.docs.len(), 3);
}

#[tokio::test]
async fn test_search_view_paginates_server_results() {
    let mut server = mockito::Server::new_async().await;
    let _tolkien = server
        .mock("GET", "/search.json")
        .match_query(author_query("tolkien"))
        .with_status(200)
        .with_body(docs_body(23))
        .create_async()
        .await;
    let _le_guin = server
        .mock("GET", "/search.json")
        .match_query(author_query("ursula le guin"))
        .with_status(200)
        .with_body(docs_body(4))
        .create_async()
        .await;

    let config = config_for(&server);
    let mut app = App::new(&config, client()).unwrap();
    app.settled().await;

    assert_eq!(app.handle(Command::Page(3)), Outcome::Render);
    {
        let state = app.state();
        let page = visible_docs(&state.data.docs, app.page_state());
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].title, "Tale 21");
    }

    app.handle(Command::Search("ursula le guin".to_string()));
    let state = app.settled().await;
    assert_eq!(app.page_state().current_page(), 1);
    assert_eq!(visible_docs(&state.data.docs, app.page_state()).len(), 4);
}

#[tokio::test]
async fn test_unreachable_host_is_failure() {
    let mut config = Config::default();
    config.api.base_url = "http://127.0.0.1:9".to_string();

    let app = App::new(&config, client() as Arc<dyn Fetcher>).unwrap();
    let state = app.settled().await;
    assert!(state.is_error);
    assert!(state.data.is_empty());
}
