use crate::errors::SearchError;

/// Largest offset or limit SQL drivers accept (a signed 64-bit integer).
pub const MAX_WINDOW: u64 = i64::MAX.unsigned_abs();

/// Function to compute the query window and page count for a request.
///
/// # Arguments
///
/// * `total_count` - Rows matching the filters, counted before any window is applied.
/// * `page` - The requested 1-based page. It is NOT clamped: a page past the
///   end produces an offset past the end, and therefore zero rows.
/// * `items_per_page` - Page size; `0` disables pagination.
///
/// # Returns
///
/// A [`Pagination`] whose `offset`/`limit` go to the query and whose
/// `clamped_page` is only meant for link generation.
#[must_use]
pub fn paginate(total_count: u64, page: u64, items_per_page: u64) -> Pagination {
    if items_per_page == 0 {
        return Pagination::disabled(page);
    }
    let total_pages = total_count.div_ceil(items_per_page);
    Pagination {
        window: Some(Window {
            offset: page
                .saturating_sub(1)
                .saturating_mul(items_per_page)
                .min(MAX_WINDOW),
            limit: items_per_page.min(MAX_WINDOW),
        }),
        total_pages,
        clamped_page: page.min(total_pages),
    }
}

/// Row window applied to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

/// Result of [`paginate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// `None` when pagination is disabled.
    pub window: Option<Window>,
    pub total_pages: u64,
    pub clamped_page: u64,
}

impl Pagination {
    /// No window, one conceptual page, no clamping.
    #[must_use]
    pub fn disabled(page: u64) -> Self {
        Self {
            window: None,
            total_pages: 1,
            clamped_page: page,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.window.is_some()
    }
}

/// Pagination state of a constructed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page: u64,
    pub items_per_page: u64,
    /// `None` when pagination is disabled (no count is run).
    pub total_count: Option<u64>,
    pub total_pages: u64,
}

impl PaginationState {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.items_per_page > 0
    }

    /// Upper-bound clamp used for page links. No lower clamp, and none at all
    /// when pagination is disabled.
    #[must_use]
    pub fn clamp_page(&self, page: u64) -> u64 {
        if self.is_enabled() {
            page.min(self.total_pages)
        } else {
            page
        }
    }

    /// Inclusive range of page numbers shown around the current page.
    #[must_use]
    pub fn link_window(&self, radius: u64) -> (u64, u64) {
        let first = self.page.saturating_sub(radius).max(1);
        let last = self.page.saturating_add(radius).min(self.total_pages);
        (first, last)
    }
}

/// Validate a requested page number.
///
/// # Errors
///
/// `InvalidPage` when `page < 1`.
pub fn validate_page(page: i64) -> Result<u64, SearchError> {
    u64::try_from(page)
        .ok()
        .filter(|page| *page >= 1)
        .ok_or(SearchError::InvalidPage { value: page })
}

/// Validate a page size; `0` is the "disable pagination" sentinel.
///
/// # Errors
///
/// `InvalidItemsPerPage` when negative.
pub fn validate_items_per_page(items_per_page: i64) -> Result<u64, SearchError> {
    u64::try_from(items_per_page).map_err(|_| SearchError::InvalidItemsPerPage {
        value: items_per_page,
    })
}
