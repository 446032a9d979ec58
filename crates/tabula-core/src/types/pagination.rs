//! Pagination bounds carried by compiled queries.

use serde::{Deserialize, Serialize};

/// Pagination bounds: 1-based page number, optional page size (`None`
/// means "all records"), and an optional pre-supplied total that lets the
/// executor skip its count query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBounds {
    /// Page number (1-based).
    pub page: u64,
    /// Number of records per page; `None` disables pagination.
    pub per_page: Option<u64>,
    /// Pre-supplied total record count, when the caller already knows it.
    pub total_entries: Option<u64>,
}

impl PageBounds {
    /// Create bounds for one page.
    pub fn new(page: u64, per_page: Option<u64>) -> Self {
        Self {
            page: page.max(1),
            per_page,
            total_entries: None,
        }
    }

    /// Unpaginated bounds (CSV export, full-resultset reads).
    pub fn unpaged() -> Self {
        Self {
            page: 1,
            per_page: None,
            total_entries: None,
        }
    }

    /// The SQL `OFFSET` value, if pagination applies.
    pub fn offset(&self) -> Option<u64> {
        self.per_page.map(|pp| (self.page.saturating_sub(1)) * pp)
    }

    /// The SQL `LIMIT` value, if pagination applies.
    pub fn limit(&self) -> Option<u64> {
        self.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let bounds = PageBounds::new(3, Some(25));
        assert_eq!(bounds.offset(), Some(50));
        assert_eq!(bounds.limit(), Some(25));
    }

    #[test]
    fn test_unpaged_has_no_bounds() {
        let bounds = PageBounds::unpaged();
        assert_eq!(bounds.offset(), None);
        assert_eq!(bounds.limit(), None);
    }

    #[test]
    fn test_page_floor_is_one() {
        assert_eq!(PageBounds::new(0, Some(10)).page, 1);
    }
}
