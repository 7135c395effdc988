//! Pagination request and response shapes for list ports.

use serde::{Deserialize, Serialize};

/// Default number of records per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,
    /// Maximum records per page.
    pub limit: u32,
}

impl PageRequest {
    /// Build a request, clamping page and limit to at least 1.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// The first page with `limit` records.
    pub fn first(limit: u32) -> Self {
        Self::new(1, limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_LIMIT)
    }
}

/// One page of records plus the total available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page.
    pub items: Vec<T>,
    /// Page number, starting at 1.
    pub page: u32,
    /// Requested page size.
    pub limit: u32,
    /// Total records across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// A page with no records.
    pub fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            page: request.page,
            limit: request.limit,
            total: 0,
        }
    }

    /// Whether later pages hold more records.
    pub fn has_more(&self) -> bool {
        let seen = u64::from(self.page.saturating_sub(1))
            .saturating_mul(u64::from(self.limit))
            .saturating_add(self.items.len() as u64);
        seen < self.total
    }
}
