//! Port for reading ratings.

use async_trait::async_trait;

use crate::domain::{Rating, RatingStats, SubjectId};

use super::{Page, PageRequest, SourceError};

/// Read access to ratings received by a subject.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingSource: Send + Sync {
    /// One page of ratings, newest first.
    async fn list(
        &self,
        subject: &SubjectId,
        page: PageRequest,
    ) -> Result<Page<Rating>, SourceError>;

    /// Aggregate figures across every rating.
    async fn stats(&self, subject: &SubjectId) -> Result<RatingStats, SourceError>;
}

/// Fixture implementation with no ratings.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRatingSource;

#[async_trait]
impl RatingSource for FixtureRatingSource {
    async fn list(
        &self,
        _subject: &SubjectId,
        page: PageRequest,
    ) -> Result<Page<Rating>, SourceError> {
        Ok(Page::empty(page))
    }

    async fn stats(&self, _subject: &SubjectId) -> Result<RatingStats, SourceError> {
        Ok(RatingStats::default())
    }
}
