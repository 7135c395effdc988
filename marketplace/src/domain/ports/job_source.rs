//! Port for reading job listings.

use async_trait::async_trait;

use crate::domain::{JobId, JobListing, SubjectId};

use super::SourceError;

/// Read access to job listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Most recent listings, newest first, at most `limit`.
    async fn list_recent(&self, limit: u32) -> Result<Vec<JobListing>, SourceError>;

    /// One listing by id; `None` when the backend has no such listing.
    async fn get(&self, id: &JobId) -> Result<Option<JobListing>, SourceError>;

    /// Every listing owned by `owner`.
    async fn list_by_owner(&self, owner: &SubjectId) -> Result<Vec<JobListing>, SourceError>;
}

/// Fixture implementation that knows no listings.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureJobSource;

#[async_trait]
impl JobSource for FixtureJobSource {
    async fn list_recent(&self, _limit: u32) -> Result<Vec<JobListing>, SourceError> {
        Ok(Vec::new())
    }

    async fn get(&self, _id: &JobId) -> Result<Option<JobListing>, SourceError> {
        Ok(None)
    }

    async fn list_by_owner(&self, _owner: &SubjectId) -> Result<Vec<JobListing>, SourceError> {
        Ok(Vec::new())
    }
}
