//! Port for reading job applications.

use async_trait::async_trait;

use crate::domain::{Application, JobId, SubjectId};

use super::SourceError;

/// Read access to applications.
///
/// Status updates are a write concern owned by the backend client and are not
/// part of this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationSource: Send + Sync {
    /// Applications submitted by `student`.
    async fn list_for_student(&self, student: &SubjectId)
    -> Result<Vec<Application>, SourceError>;

    /// Applications received for one listing.
    async fn list_for_listing(&self, listing: &JobId) -> Result<Vec<Application>, SourceError>;
}

/// Fixture implementation that knows no applications.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureApplicationSource;

#[async_trait]
impl ApplicationSource for FixtureApplicationSource {
    async fn list_for_student(
        &self,
        _student: &SubjectId,
    ) -> Result<Vec<Application>, SourceError> {
        Ok(Vec::new())
    }

    async fn list_for_listing(&self, _listing: &JobId) -> Result<Vec<Application>, SourceError> {
        Ok(Vec::new())
    }
}
