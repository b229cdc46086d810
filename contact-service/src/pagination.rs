//! Page arithmetic for list endpoints
//!
//! A list request names a 1-based `page` and a `page_size` (`per_page` is
//! accepted too). Both are sanitised against [`PaginationConfig`] and the
//! total item count before the repository is asked for a window:
//!
//! ```rust
//! use contact_service::config::PaginationConfig;
//! use contact_service::pagination::{PageQuery, Pages};
//!
//! let query = PageQuery::new(Some(3), Some(20));
//! let pages = Pages::from_query(&query, 45, &PaginationConfig::default());
//!
//! assert_eq!(pages.page(), 3);
//! assert_eq!(pages.total_pages(), 3);
//! assert_eq!(pages.offset(), 40);
//! assert_eq!(pages.limit(), 20);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

/// Raw `?page=&page_size=` query parameters
///
/// Values that are missing, unparsable or out of range fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// Requested page, 1-based
    pub page: Option<String>,

    /// Requested page size
    pub page_size: Option<String>,
}

impl PageQuery {
    /// Build a query from numeric values
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.map(|p| p.to_string()),
            page_size: page_size.map(|s| s.to_string()),
        }
    }

    /// Collect the pagination parameters from decoded query pairs.
    ///
    /// The first occurrence of each parameter wins, with `per_page` and
    /// `page_size` treated as the same parameter. Unrelated keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut query.page,
                "page_size" | "per_page" => &mut query.page_size,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    fn page_number(&self) -> Option<i64> {
        parse_param(self.page.as_deref())
    }

    fn page_size_number(&self) -> Option<i64> {
        parse_param(self.page_size.as_deref())
    }
}

fn parse_param(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Sanitised page window over `total_count` items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pages {
    page: u64,
    page_size: u64,
    total_count: u64,
    total_pages: u64,
}

impl Pages {
    /// Resolve the window for `page`/`page_size` over `total_count` items.
    ///
    /// - a page size of zero or below uses the configured default
    /// - a page size above the configured maximum is capped
    /// - a page below 1 becomes 1
    /// - a page past the last one becomes the last one
    pub fn new(
        page: Option<i64>,
        page_size: Option<i64>,
        total_count: u64,
        limits: &PaginationConfig,
    ) -> Self {
        let default_size = u64::from(limits.default_page_size.max(1));
        let max_size = u64::from(limits.max_page_size.max(1));

        let page_size = match page_size {
            Some(size) if size > 0 => (size as u64).min(max_size),
            _ => default_size.min(max_size),
        };

        let total_pages = calculate_total_pages(total_count, page_size);

        let page = match page {
            Some(p) if p > 1 => p as u64,
            _ => 1,
        };
        let page = if total_pages > 0 {
            page.min(total_pages)
        } else {
            1
        };

        Self {
            page,
            page_size,
            total_count,
            total_pages,
        }
    }

    /// Resolve the window described by a [`PageQuery`]
    pub fn from_query(query: &PageQuery, total_count: u64, limits: &PaginationConfig) -> Self {
        Self::new(
            query.page_number(),
            query.page_size_number(),
            total_count,
            limits,
        )
    }

    /// Current page, 1-based
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Items per page
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Total items across all pages
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of pages, zero when there are no items
    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Items to skip before this page
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Maximum items on this page
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Wrap the items of this page in the response envelope
    pub fn wrap<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            items,
        }
    }
}

/// Ceiling division; zero pages for an empty collection
fn calculate_total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Paginated list response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Current page, 1-based
    pub page: u64,
    /// Items per page
    pub page_size: u64,
    /// Total items across all pages
    pub total_count: u64,
    /// Number of pages
    pub total_pages: u64,
    /// Items on this page
    pub items: Vec<T>,
}
