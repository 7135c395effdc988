//! DTOs for decoding marketplace REST responses.
//!
//! Every response wraps its payload as `{"data": ...}`. Records decode straight
//! into domain types; only paging and aggregate shapes need translation.

use serde::Deserialize;

use crate::domain::RatingStats;
use crate::domain::ports::{Page, PageRequest};

#[derive(Debug, Deserialize)]
pub(super) struct ApiEnvelope<T> {
    pub(super) data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PageDto<T> {
    #[serde(default = "Vec::new")]
    pub(super) items: Vec<T>,
    pub(super) page: Option<u32>,
    pub(super) limit: Option<u32>,
    pub(super) total: Option<u64>,
}

impl<T> PageDto<T> {
    /// Fill gaps in the server's paging metadata from the request.
    pub(super) fn into_page(self, request: PageRequest) -> Page<T> {
        let counted = self.items.len() as u64;
        Page {
            page: self.page.unwrap_or(request.page),
            limit: self.limit.unwrap_or(request.limit),
            total: self.total.unwrap_or(counted).max(counted),
            items: self.items,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CountDto {
    pub(super) count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RatingStatsDto {
    #[serde(default)]
    pub(super) count: u32,
    #[serde(default)]
    pub(super) average: f64,
}

impl RatingStatsDto {
    pub(super) fn into_domain(self) -> RatingStats {
        if self.count == 0 {
            return RatingStats::default();
        }
        let tenths = (self.average * 10.0).round().clamp(0.0, 50.0);
        RatingStats {
            count: self.count,
            average_tenths: tenths as u32,
        }
    }
}
