//! Pagination types for list operations.
//!
//! Every list-returning store operation takes an `Option<Page>`: `None`
//! returns everything, `Some(page)` applies `OFFSET start LIMIT limit`.

use serde::{Deserialize, Serialize};

/// An offset/limit window over a result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Number of rows to skip.
    pub start: u64,
    /// Maximum number of rows to return.
    pub limit: u64,
}

impl Page {
    /// Create a page window.
    #[must_use]
    pub fn new(start: u64, limit: u64) -> Self {
        Self { start, limit }
    }

    /// Map the legacy wire convention onto `Option<Page>`.
    ///
    /// `limit == -1` means "no pagination, return everything" (`start` is
    /// ignored); negative `start` values are clamped to 0.
    #[must_use]
    pub fn from_legacy(start: i64, limit: i64) -> Option<Self> {
        if limit == -1 {
            return None;
        }
        Some(Self {
            start: start.max(0) as u64,
            limit: limit.max(0) as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_legacy_unpaginated() {
        assert_eq!(Page::from_legacy(-1, -1), None);
        // start is ignored when limit is -1
        assert_eq!(Page::from_legacy(10, -1), None);
    }

    #[test]
    fn test_from_legacy_window() {
        assert_eq!(Page::from_legacy(0, 50), Some(Page::new(0, 50)));
        assert_eq!(Page::from_legacy(20, 10), Some(Page::new(20, 10)));
    }

    #[test]
    fn test_from_legacy_clamps_negative_start() {
        assert_eq!(Page::from_legacy(-5, 10), Some(Page::new(0, 10)));
    }
}
