//! Terminal display helpers.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;
use unicode_width::UnicodeWidthChar;

/// Width used when the terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

const ELLIPSIS: &str = "...";

static WIDTH: OnceLock<usize> = OnceLock::new();

/// Current terminal width in columns, measured once.
pub fn terminal_width() -> usize {
    *WIDTH.get_or_init(|| {
        terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(DEFAULT_WIDTH)
    })
}

/// Check if stdout is a terminal.
#[inline]
pub fn is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Cut `text` to at most `max_width` display columns, ending in `...` when cut.
///
/// ```
/// use book_finder::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("The Silmarillion", 10), "The Sil...");
/// assert_eq!(truncate_with_ellipsis("Beren", 10), "Beren");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    let width = |c: char| c.width().unwrap_or(1);

    if text.chars().map(width).sum::<usize>() <= max_width {
        return text.to_string();
    }
    if max_width <= ELLIPSIS.len() {
        return ELLIPSIS[..max_width].to_string();
    }

    let budget = max_width - ELLIPSIS.len();
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = width(c);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(truncate_with_ellipsis("Hobbit", 6), "Hobbit");
    }

    #[test]
    fn test_truncates_to_width() {
        let out = truncate_with_ellipsis("The Fellowship of the Ring", 12);
        assert_eq!(out, "The Fello...");
        assert_eq!(out.chars().count(), 12);
    }

    #[test]
    fn test_wide_characters() {
        // Each CJK character is two columns wide
        let out = truncate_with_ellipsis("指輪物語の本", 7);
        assert_eq!(out, "指輪...");
    }

    #[test]
    fn test_tiny_width() {
        assert_eq!(truncate_with_ellipsis("Silmarillion", 2), "..");
        assert_eq!(truncate_with_ellipsis("Silmarillion", 0), "");
    }
}
