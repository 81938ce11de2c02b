//! Client-side pagination over an in-memory result list.
//!
//! - [`paginate`]: slice out one page of items
//! - [`range`] and [`page_count`]: compute the page numbers to offer
//! - [`PageState`]: the query, current page and page size of a view
//! - [`PaginationControl`]: the page buttons bound to a change callback

mod control;

pub use control::{PageButton, PaginationControl};

use std::num::NonZeroUsize;

/// Default number of items shown per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Return the items on a 1-based page.
///
/// The slice is clipped to the available items and is empty when the page
/// starts past the end. Page 0 is treated as page 1.
///
/// ```
/// use book_finder::pagination::paginate;
///
/// let items: Vec<u32> = (1..=25).collect();
/// assert_eq!(paginate(&items, 3, 10), &[21, 22, 23, 24, 25]);
/// assert!(paginate(&items, 4, 10).is_empty());
/// ```
pub fn paginate<T>(items: &[T], page_number: usize, page_size: usize) -> &[T] {
    let start = page_number.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Integers from `start` up to but excluding `end`.
pub fn range(start: usize, end: usize) -> Vec<usize> {
    (start..end).collect()
}

/// Number of pages needed to show `total` items.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Page numbers `1..=page_count(total, page_size)`.
pub fn page_numbers(total: usize, page_size: usize) -> Vec<usize> {
    range(1, page_count(total, page_size) + 1)
}

/// View state for a paginated search.
///
/// The current page is always at least 1 and goes back to 1 whenever the
/// page size changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    query: String,
    current_page: usize,
    page_size: NonZeroUsize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(crate::models::DEFAULT_QUERY, default_page_size())
    }
}

fn default_page_size() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN)
}

impl PageState {
    /// Create a view state on page 1
    pub fn new(query: impl Into<String>, page_size: NonZeroUsize) -> Self {
        Self {
            query: query.into(),
            current_page: 1,
            page_size,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Replace the query text
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Move to a page; 0 is clamped to 1
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Change the page size and return to the first page
    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
        self.current_page = 1;
    }

    /// Advance one page if `total` items leave room for it
    pub fn next_page(&mut self, total: usize) -> bool {
        if self.current_page < page_count(total, self.page_size()) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page, stopping at page 1
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// The items on the current page
    pub fn page_of<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.current_page, self.page_size())
    }
}
