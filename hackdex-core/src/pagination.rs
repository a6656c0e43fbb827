//! Page windows with one row of lookahead.

use crate::constants::PAGE_SIZE;

/// Inclusive row range for a 1-based page, including one lookahead row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
}

impl PageWindow {
    #[must_use]
    pub const fn new(page: u32) -> Self {
        Self::sized(page, PAGE_SIZE)
    }

    #[must_use]
    pub const fn sized(page: u32, page_size: u32) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            page_size,
        }
    }

    #[must_use]
    pub const fn range_start(self) -> u32 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Last requested row; one past the visible page so `has_more` can be derived.
    #[must_use]
    pub const fn range_end(self) -> u32 {
        self.range_start().saturating_add(self.page_size)
    }
}

/// Rows of one page with the lookahead row trimmed off.
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub rows: Vec<T>,
    pub has_more: bool,
}

impl<T> Paged<T> {
    #[must_use]
    pub fn from_lookahead(mut rows: Vec<T>, page_size: u32) -> Self {
        let visible = usize::try_from(page_size).unwrap_or(usize::MAX);
        let has_more = rows.len() > visible;
        rows.truncate(visible);
        Self { rows, has_more }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            rows: Vec::new(),
            has_more: false,
        }
    }
}

/// Parse a `page` parameter; anything but a positive integer is page 1.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_requests_one_extra_row() {
        let first = PageWindow::new(1);
        assert_eq!((first.range_start(), first.range_end()), (0, 50));
        let second = PageWindow::new(2);
        assert_eq!((second.range_start(), second.range_end()), (50, 100));
        assert_eq!(PageWindow::new(0), PageWindow::new(1));
    }

    #[test]
    fn exactly_a_full_page_has_no_more() {
        let paged = Paged::from_lookahead((0..50).collect::<Vec<_>>(), 50);
        assert!(!paged.has_more);
        assert_eq!(paged.rows.len(), 50);
    }

    #[test]
    fn lookahead_row_signals_more_and_is_trimmed() {
        let paged = Paged::from_lookahead((0..51).collect::<Vec<_>>(), 50);
        assert!(paged.has_more);
        assert_eq!(paged.rows.len(), 50);
        assert_eq!(paged.rows.last(), Some(&49));
    }

    #[test]
    fn page_parameter_is_lenient() {
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some(" 2 ")), 2);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-4")), 1);
        assert_eq!(parse_page(Some("two")), 1);
        assert_eq!(parse_page(None), 1);
    }
}
