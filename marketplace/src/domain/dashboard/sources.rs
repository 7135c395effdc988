//! [`DataSource`] adapters over the read ports.
//!
//! Each wraps one port call and tags its records with a [`SourceKey`], so the
//! aggregator never needs to know which port it is talking to.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::aggregator::DataSource;
use crate::domain::ports::{
    ApplicationSource, JobSource, MessageSource, NotificationSource, PageRequest, PaymentSource,
    RatingSource, SourceError,
};
use crate::domain::{SourceKey, SourcePayload, SubjectId};

/// Newest listings, independent of the subject.
pub struct RecentJobsSource {
    jobs: Arc<dyn JobSource>,
    limit: u32,
}

impl RecentJobsSource {
    /// Read at most `limit` recent listings from `jobs`.
    pub fn new(jobs: Arc<dyn JobSource>, limit: u32) -> Self {
        Self { jobs, limit }
    }
}

#[async_trait]
impl DataSource for RecentJobsSource {
    fn key(&self) -> SourceKey {
        SourceKey::RecentJobs
    }

    async fn fetch(&self, _subject: &SubjectId) -> Result<SourcePayload, SourceError> {
        Ok(self.jobs.list_recent(self.limit).await?.into())
    }
}

/// Listings owned by the subject.
pub struct OwnedJobsSource {
    jobs: Arc<dyn JobSource>,
}

impl OwnedJobsSource {
    /// Read owned listings from `jobs`.
    pub fn new(jobs: Arc<dyn JobSource>) -> Self {
        Self { jobs }
    }
}

#[async_trait]
impl DataSource for OwnedJobsSource {
    fn key(&self) -> SourceKey {
        SourceKey::MyJobs
    }

    async fn fetch(&self, subject: &SubjectId) -> Result<SourcePayload, SourceError> {
        Ok(self.jobs.list_by_owner(subject).await?.into())
    }
}

/// Applications submitted by the subject.
pub struct StudentApplicationsSource {
    applications: Arc<dyn ApplicationSource>,
}

impl StudentApplicationsSource {
    /// Read the subject's applications from `applications`.
    pub fn new(applications: Arc<dyn ApplicationSource>) -> Self {
        Self { applications }
    }
}

#[async_trait]
impl DataSource for StudentApplicationsSource {
    fn key(&self) -> SourceKey {
        SourceKey::Applications
    }

    async fn fetch(&self, subject: &SubjectId) -> Result<SourcePayload, SourceError> {
        Ok(self.applications.list_for_student(subject).await?.into())
    }
}

/// First page of the subject's notifications.
pub struct NotificationsSource {
    notifications: Arc<dyn NotificationSource>,
    page: PageRequest,
}

impl NotificationsSource {
    /// Read `page` of notifications.
    pub fn new(notifications: Arc<dyn NotificationSource>, page: PageRequest) -> Self {
        Self {
            notifications,
            page,
        }
    }
}

#[async_trait]
impl DataSource for NotificationsSource {
    fn key(&self) -> SourceKey {
        SourceKey::Notifications
    }

    async fn fetch(&self, subject: &SubjectId) -> Result<SourcePayload, SourceError> {
        Ok(self.notifications.list(subject, self.page).await?.items.into())
    }
}

/// Unread messages addressed to the subject.
pub struct UnreadMessagesSource {
    messages: Arc<dyn MessageSource>,
}

impl UnreadMessagesSource {
    /// Read unread messages from `messages`.
    pub fn new(messages: Arc<dyn MessageSource>) -> Self {
        Self { messages }
    }
}

#[async_trait]
impl DataSource for UnreadMessagesSource {
    fn key(&self) -> SourceKey {
        SourceKey::UnreadMessages
    }

    async fn fetch(&self, subject: &SubjectId) -> Result<SourcePayload, SourceError> {
        Ok(self.messages.list_unread(subject).await?.into())
    }
}

/// First page of ratings received by the subject.
pub struct RatingsSource {
    ratings: Arc<dyn RatingSource>,
    page: PageRequest,
}

impl RatingsSource {
    /// Read `page` of ratings.
    pub fn new(ratings: Arc<dyn RatingSource>, page: PageRequest) -> Self {
        Self { ratings, page }
    }
}

#[async_trait]
impl DataSource for RatingsSource {
    fn key(&self) -> SourceKey {
        SourceKey::Ratings
    }

    async fn fetch(&self, subject: &SubjectId) -> Result<SourcePayload, SourceError> {
        Ok(self.ratings.list(subject, self.page).await?.items.into())
    }
}

/// First page of the subject's payments.
pub struct PaymentsSource {
    payments: Arc<dyn PaymentSource>,
    page: PageRequest,
}

impl PaymentsSource {
    /// Read `page` of payments.
    pub fn new(payments: Arc<dyn PaymentSource>, page: PageRequest) -> Self {
        Self { payments, page }
    }
}

#[async_trait]
impl DataSource for PaymentsSource {
    fn key(&self) -> SourceKey {
        SourceKey::Payments
    }

    async fn fetch(&self, subject: &SubjectId) -> Result<SourcePayload, SourceError> {
        Ok(self.payments.list(subject, self.page).await?.items.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockJobSource, MockNotificationSource, Page};
    use crate::domain::{JobListing, Notification};
    use chrono::{DateTime, Utc};
    use mockall::predicate::eq;

    fn subject() -> SubjectId {
        SubjectId::new("employer-9").expect("valid id")
    }

    #[tokio::test]
    async fn recent_jobs_passes_configured_limit() {
        let mut jobs = MockJobSource::new();
        jobs.expect_list_recent()
            .with(eq(3_u32))
            .times(1)
            .returning(|_| Ok(vec![JobListing::builder("job-1", "Tutor").build()]));
        let source = RecentJobsSource::new(Arc::new(jobs), 3);

        let payload = source.fetch(&subject()).await.expect("fetch succeeds");

        assert_eq!(payload.len(), 1);
        assert!(source.key().accepts(&payload));
    }

    #[tokio::test]
    async fn owned_jobs_queries_by_subject() {
        let mut jobs = MockJobSource::new();
        jobs.expect_list_by_owner()
            .with(eq(subject()))
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let source = OwnedJobsSource::new(Arc::new(jobs));

        let payload = source.fetch(&subject()).await.expect("fetch succeeds");

        assert!(payload.is_empty());
        assert_eq!(source.key(), SourceKey::MyJobs);
    }

    #[tokio::test]
    async fn notifications_unwrap_the_requested_page() {
        let request = PageRequest::first(2);
        let mut notifications = MockNotificationSource::new();
        notifications
            .expect_list()
            .with(eq(subject()), eq(request))
            .times(1)
            .returning(|_, page| {
                Ok(Page {
                    items: vec![Notification {
                        id: "n1".to_owned(),
                        title: "Welcome".to_owned(),
                        message: "Thanks for joining".to_owned(),
                        kind: "system".to_owned(),
                        read: false,
                        created_at: DateTime::<Utc>::UNIX_EPOCH,
                    }],
                    page: page.page,
                    limit: page.limit,
                    total: 1,
                })
            });
        let source = NotificationsSource::new(Arc::new(notifications), request);

        let payload = source.fetch(&subject()).await.expect("fetch succeeds");

        assert_eq!(payload, SourcePayload::Notifications(vec![Notification {
            id: "n1".to_owned(),
            title: "Welcome".to_owned(),
            message: "Thanks for joining".to_owned(),
            kind: "system".to_owned(),
            read: false,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }]));
    }

    #[tokio::test]
    async fn port_errors_propagate_unchanged() {
        let mut jobs = MockJobSource::new();
        jobs.expect_list_by_owner()
            .returning(|_| Err(SourceError::unauthorized("token expired")));
        let source = OwnedJobsSource::new(Arc::new(jobs));

        let error = source.fetch(&subject()).await.expect_err("fetch fails");

        assert_eq!(error, SourceError::unauthorized("token expired"));
    }
}
