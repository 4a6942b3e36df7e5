use serde::{Deserialize, Serialize};

/// Number of results revealed per "load more" step.
pub const PAGE_SIZE: usize = 10;

/// Growing prefix over a result sequence.
///
/// Page `P` reveals the first `P * page_size` results. Loading more never
/// re-runs the search; it only widens the slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Jump straight to `page` (clamped to at least 1).
    pub fn at_page(page_size: usize, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..Self::new(page_size)
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of results visible at the current page, capped at `total`.
    pub fn visible_count(&self, total: usize) -> usize {
        self.page.saturating_mul(self.page_size).min(total)
    }

    /// Visible prefix of `results`.
    pub fn visible<'a, T>(&self, results: &'a [T]) -> &'a [T] {
        &results[..self.visible_count(results.len())]
    }

    /// True when `total` results exceed what is currently visible.
    pub fn has_more(&self, total: usize) -> bool {
        total > self.page.saturating_mul(self.page_size)
    }

    pub fn load_more(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// Jump to `page`, clamped to at least 1.
    pub fn show_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}
