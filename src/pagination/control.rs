//! Page button bar bound to a page-change callback.

use std::fmt;

use super::page_numbers;

/// One button in the bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    /// Page number shown on the button
    pub label: usize,
    /// Whether this is the page being viewed
    pub current: bool,
}

/// Pagination control for a result list.
///
/// A list of zero or one item gets no buttons at all. Otherwise there is one
/// button per page, and [`click`](Self::click) forwards the clicked label to
/// the callback.
pub struct PaginationControl<F>
where
    F: FnMut(usize),
{
    buttons: Vec<PageButton>,
    on_page_change: F,
}

impl<F> PaginationControl<F>
where
    F: FnMut(usize),
{
    pub fn new<T>(items: &[T], page_size: usize, current_page: usize, on_page_change: F) -> Self {
        let buttons = if items.len() <= 1 {
            Vec::new()
        } else {
            page_numbers(items.len(), page_size)
                .into_iter()
                .map(|label| PageButton {
                    label,
                    current: label == current_page,
                })
                .collect()
        };

        Self {
            buttons,
            on_page_change,
        }
    }

    pub fn buttons(&self) -> &[PageButton] {
        &self.buttons
    }

    /// Whether the control renders nothing
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Press the button labelled `label`.
    ///
    /// Returns `false` without calling back when no such button exists.
    pub fn click(&mut self, label: usize) -> bool {
        if !self.buttons.iter().any(|b| b.label == label) {
            return false;
        }
        (self.on_page_change)(label);
        true
    }
}

impl<F> fmt::Display for PaginationControl<F>
where
    F: FnMut(usize),
{
    /// Renders as `[1] [*2] [3]`, with the current page starred.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, button) in self.buttons.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if button.current {
                write!(f, "[*{}]", button.label)?;
            } else {
                write!(f, "[{}]", button.label)?;
            }
        }
        Ok(())
    }
}

impl<F> fmt::Debug for PaginationControl<F>
where
    F: FnMut(usize),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationControl")
            .field("buttons", &self.buttons)
            .finish_non_exhaustive()
    }
}
