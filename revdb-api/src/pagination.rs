//! Pagination utilities for list endpoints

/// Rows per page for all list endpoints
pub const PAGE_SIZE: i64 = 20;

/// Window into a result set, derived from total results and the
/// requested page
#[derive(Debug, Clone, Copy)]
pub struct PageWindow {
    /// Current page number (1-indexed, clamped to valid bounds)
    pub page: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

/// Calculate a page window, clamping the requested page to
/// [1, total_pages]
pub fn page_window(total_results: i64, requested_page: i64) -> PageWindow {
    let total_pages = (total_results + PAGE_SIZE - 1) / PAGE_SIZE;
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * PAGE_SIZE;

    PageWindow {
        page,
        total_pages,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_normal() {
        let w = page_window(50, 2);
        assert_eq!(w.page, 2);
        assert_eq!(w.total_pages, 3);
        assert_eq!(w.offset, 20);
    }

    #[test]
    fn window_clamps_high() {
        let w = page_window(30, 99);
        assert_eq!(w.page, 2);
        assert_eq!(w.offset, 20);
    }

    #[test]
    fn window_clamps_low() {
        let w = page_window(30, 0);
        assert_eq!(w.page, 1);
        assert_eq!(w.offset, 0);
    }

    #[test]
    fn window_empty() {
        let w = page_window(0, 1);
        assert_eq!(w.page, 1);
        assert_eq!(w.total_pages, 0);
        assert_eq!(w.offset, 0);
    }

    #[test]
    fn window_exact_boundary() {
        let w = page_window(40, 2);
        assert_eq!(w.page, 2);
        assert_eq!(w.total_pages, 2);
        assert_eq!(w.offset, 20);
    }
}
