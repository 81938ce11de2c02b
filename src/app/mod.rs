//! Search view: binds a [`DataApi`] and a [`PageState`] to user commands.
//!
//! The view renders through [`crate::ui::render_view`]; the binary drives it
//! from a line-oriented shell.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::watch;

use crate::config::Config;
use crate::fetch::{DataApi, FetchState, Fetcher};
use crate::models::{BookDoc, SearchQuery, SearchResult};
use crate::pagination::{PageState, PaginationControl};

/// Interactive shell help text
pub const HELP: &str = "\
Commands:
  <author>           search for an author (same as `search <author>`)
  search <author>    search for an author
  page <n>           jump to page n
  next | prev        move one page forward or back
  size <n>           show n results per page (returns to page 1)
  open <n>           print the web search link for row n
  refresh            repeat the current search
  help               show this help
  quit               leave";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Page(usize),
    Next,
    Prev,
    Size(NonZeroUsize),
    Open(usize),
    Refresh,
    Help,
    Quit,
}

/// Errors from [`parse_command`]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("Not a positive number: {0}")]
    InvalidNumber(String),
}

/// Parse one line of shell input. Blank lines yield `None`.
///
/// A line that does not start with a known command is an author search.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "search" | "s" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("search"));
            }
            Command::Search(rest.to_string())
        }
        "page" | "p" => Command::Page(number(rest, "page")?.get()),
        "size" => Command::Size(number(rest, "size")?),
        "open" | "o" => Command::Open(number(rest, "open")?.get()),
        "next" | "n" if rest.is_empty() => Command::Next,
        "prev" | "b" if rest.is_empty() => Command::Prev,
        "refresh" | "r" if rest.is_empty() => Command::Refresh,
        "help" | "?" if rest.is_empty() => Command::Help,
        "quit" | "exit" | "q" if rest.is_empty() => Command::Quit,
        _ => Command::Search(line.to_string()),
    };

    Ok(Some(command))
}

fn number(text: &str, command: &'static str) -> Result<NonZeroUsize, CommandError> {
    if text.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    text.parse()
        .map_err(|_| CommandError::InvalidNumber(text.to_string()))
}

/// What the caller should do after [`App::handle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed; draw the view again
    Render,
    /// Show a message without redrawing
    Message(String),
    Quit,
}

/// The records shown for the current page.
///
/// Lists that fit in one page are shown whole.
pub fn visible_docs<'a>(docs: &'a [BookDoc], page: &PageState) -> &'a [BookDoc] {
    if docs.len() > page.page_size() {
        page.page_of(docs)
    } else {
        docs
    }
}

/// Search view state
#[derive(Debug)]
pub struct App {
    api: DataApi<SearchResult>,
    page: PageState,
    base_url: String,
    sort: String,
}

impl App {
    /// Start on the configured default query
    pub fn new(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<Self, url::ParseError> {
        Self::with_query(
            config,
            &config.display.default_query,
            config.display.page_size(),
            fetcher,
        )
    }

    /// Start on `query` with `page_size` results per page
    pub fn with_query(
        config: &Config,
        query: &str,
        page_size: NonZeroUsize,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, url::ParseError> {
        let url = SearchQuery::new(query)
            .sort(config.api.sort.clone())
            .url(&config.api.base_url)?;

        tracing::info!(query, "Starting search view");

        Ok(Self {
            api: DataApi::new(url, SearchResult::default(), fetcher),
            page: PageState::new(query, page_size),
            base_url: config.api.base_url.clone(),
            sort: config.api.sort.clone(),
        })
    }

    pub fn page_state(&self) -> &PageState {
        &self.page
    }

    pub fn state(&self) -> watch::Ref<'_, FetchState<SearchResult>> {
        self.api.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<SearchResult>> {
        self.api.subscribe()
    }

    /// Wait for the latest search to complete
    pub async fn settled(&self) -> FetchState<SearchResult> {
        self.api.settled().await
    }

    /// Submit a new author search and return to page 1
    pub fn search(&mut self, query: &str) -> Result<(), url::ParseError> {
        let url = SearchQuery::new(query)
            .sort(self.sort.clone())
            .url(&self.base_url)?;

        self.page.set_query(query);
        self.page.set_page(1);
        if !self.api.set_url(url) {
            tracing::debug!(url = self.api.url(), "Query unchanged, not refetching");
        }
        Ok(())
    }

    /// Apply a shell command
    pub fn handle(&mut self, command: Command) -> Outcome {
        match command {
            Command::Search(query) => match self.search(&query) {
                Ok(()) => Outcome::Render,
                Err(err) => Outcome::Message(format!("Cannot build search URL: {}", err)),
            },
            Command::Page(label) => {
                let state = self.api.state();
                let page = &mut self.page;
                let current = page.current_page();
                let size = page.page_size();
                let mut control =
                    PaginationControl::new(&state.data.docs, size, current, |p| page.set_page(p));
                if control.click(label) {
                    Outcome::Render
                } else {
                    Outcome::Message(format!("No page {}", label))
                }
            }
            Command::Next => {
                let total = self.api.state().data.docs.len();
                if self.page.next_page(total) {
                    Outcome::Render
                } else {
                    Outcome::Message("Already on the last page".to_string())
                }
            }
            Command::Prev => {
                if self.page.prev_page() {
                    Outcome::Render
                } else {
                    Outcome::Message("Already on the first page".to_string())
                }
            }
            Command::Size(size) => {
                self.page.set_page_size(size);
                Outcome::Render
            }
            Command::Open(row) => {
                let state = self.api.state();
                let visible = visible_docs(&state.data.docs, &self.page);
                match row.checked_sub(1).and_then(|i| visible.get(i)) {
                    Some(doc) => Outcome::Message(doc.google_link()),
                    None => Outcome::Message(format!("No result {} on this page", row)),
                }
            }
            Command::Refresh => {
                self.api.refetch();
                Outcome::Render
            }
            Command::Help => Outcome::Message(HELP.to_string()),
            Command::Quit => Outcome::Quit,
        }
    }
}
