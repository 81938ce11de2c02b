//! Terminal rendering for the search view.
//!
//! Everything here returns strings so the shell and the tests share one
//! code path; `styled` switches ANSI colours on or off.

use owo_colors::OwoColorize;
use std::time::Duration;

use crate::app::visible_docs;
use crate::fetch::{FetchPhase, FetchState};
use crate::models::SearchResult;
use crate::pagination::{page_count, PageState, PaginationControl};
use crate::utils::truncate_with_ellipsis;

/// Shown while a request is in flight
pub const LOADING_MESSAGE: &str = "Loading ...";

/// Shown after a failed request
pub const ERROR_MESSAGE: &str = "Something went wrong ...";

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Info,
    Loading,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Info => "ℹ",
        Status::Loading => "◐",
        Status::Search => "🔍",
    }
}

/// Format an icon-prefixed status line.
pub fn status_line(status: Status, message: &str, styled: bool) -> String {
    let icon = status_icon(status);
    if !styled {
        return format!("{} {}", icon, message);
    }
    match status {
        Status::Success => format!("{} {}", icon.green().bold(), message),
        Status::Error => format!("{} {}", icon.red().bold(), message.red()),
        Status::Info => format!("{} {}", icon.cyan().bold(), message),
        Status::Loading => format!("{} {}", icon.cyan(), message.dimmed()),
        Status::Search => format!("{} {}", icon.yellow(), message.bold()),
    }
}

/// Render the whole view: query, status, result list and page bar.
pub fn render_view(
    state: &FetchState<SearchResult>,
    page: &PageState,
    styled: bool,
    width: usize,
) -> String {
    let mut lines = vec![status_line(
        Status::Search,
        &format!("Author: {}", page.query()),
        styled,
    )];

    if state.is_error {
        lines.push(status_line(Status::Error, ERROR_MESSAGE, styled));
    }

    if state.phase() == FetchPhase::Loading {
        lines.push(status_line(Status::Loading, LOADING_MESSAGE, styled));
        return lines.join("\n");
    }

    let docs = &state.data.docs;
    if docs.is_empty() {
        lines.push(status_line(Status::Info, "No results.", styled));
        return lines.join("\n");
    }

    let title_width = width.saturating_sub(8).max(16);
    for (row, doc) in visible_docs(docs, page).iter().enumerate() {
        let mut title = truncate_with_ellipsis(&doc.title, title_width);
        if !doc.author_name.is_empty() {
            title = format!("{} ({})", title, truncate_with_ellipsis(&doc.authors(), 40));
        }
        let link = doc.google_link();
        if styled {
            lines.push(format!("{:>3}. {}", (row + 1).yellow(), title.bold()));
            lines.push(format!("     {}", link.dimmed()));
        } else {
            lines.push(format!("{:>3}. {}", row + 1, title));
            lines.push(format!("     {}", link));
        }
    }

    if docs.len() > page.page_size() {
        let control = PaginationControl::new(docs, page.page_size(), page.current_page(), |_| {});
        lines.push(String::new());
        lines.push(render_control(&control, styled));
        lines.push(format!(
            "Page {} of {}, {} results",
            page.current_page(),
            page_count(docs.len(), page.page_size()),
            docs.len()
        ));
    }

    lines.join("\n")
}

fn render_control<F: FnMut(usize)>(control: &PaginationControl<F>, styled: bool) -> String {
    if !styled {
        return control.to_string();
    }
    control
        .buttons()
        .iter()
        .map(|button| {
            let label = format!("[{}]", button.label);
            if button.current {
                label.reversed().bold().to_string()
            } else {
                label.cyan().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Spinner shown while a one-shot search is in flight
pub fn loading_spinner(message: &str) -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
