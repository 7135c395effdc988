//! Port for reading notifications.

use async_trait::async_trait;

use crate::domain::{Notification, SubjectId};

use super::{Page, PageRequest, SourceError};

/// Read access to a subject's notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// One page of notifications, newest first.
    async fn list(
        &self,
        subject: &SubjectId,
        page: PageRequest,
    ) -> Result<Page<Notification>, SourceError>;

    /// Number of unread notifications.
    async fn unread_count(&self, subject: &SubjectId) -> Result<u32, SourceError>;
}

/// Fixture implementation with an empty inbox.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationSource;

#[async_trait]
impl NotificationSource for FixtureNotificationSource {
    async fn list(
        &self,
        _subject: &SubjectId,
        page: PageRequest,
    ) -> Result<Page<Notification>, SourceError> {
        Ok(Page::empty(page))
    }

    async fn unread_count(&self, _subject: &SubjectId) -> Result<u32, SourceError> {
        Ok(0)
    }
}
