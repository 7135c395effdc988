//! Role-specific dashboards assembled from independently failing sources.
//!
//! [`DashboardService`] knows which sources each role needs and turns the
//! aggregated composite into a presentation model. [`DashboardView`] adds the
//! screen lifecycle on top: load, serialised refresh, unread polling, and
//! disposal.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::aggregator::{
    AggregationError, AggregatorConfig, DataSource, PartialFailureAggregator,
};
use crate::domain::ports::{
    ApplicationSource, DEFAULT_PAGE_LIMIT, FixtureApplicationSource, FixtureJobSource,
    FixtureMessageSource, FixtureNotificationSource, FixturePaymentSource, FixtureRatingSource,
    JobSource, MessageSource, NotificationSource, PageRequest, PaymentSource, RatingSource,
};
use crate::domain::{Role, SourceFailure, Subject, SubjectId};

mod employer;
mod sources;
mod student;
mod view;

pub use employer::{EMPLOYER_SOURCES, EmployerDashboardModel, total_applicants};
pub use sources::{
    NotificationsSource, OwnedJobsSource, PaymentsSource, RatingsSource, RecentJobsSource,
    StudentApplicationsSource, UnreadMessagesSource,
};
pub use student::{STUDENT_SOURCES, StudentDashboardModel};
pub use view::{DashboardError, DashboardSnapshot, DashboardView, UnreadCounts};

/// Default number of recent listings on the student dashboard.
pub const DEFAULT_RECENT_JOBS_LIMIT: u32 = 5;

/// Read ports a dashboard draws from.
#[derive(Clone)]
pub struct DashboardPorts {
    /// Job listings.
    pub jobs: Arc<dyn JobSource>,
    /// Applications.
    pub applications: Arc<dyn ApplicationSource>,
    /// Notifications.
    pub notifications: Arc<dyn NotificationSource>,
    /// Direct messages.
    pub messages: Arc<dyn MessageSource>,
    /// Ratings.
    pub ratings: Arc<dyn RatingSource>,
    /// Payments.
    pub payments: Arc<dyn PaymentSource>,
}

impl DashboardPorts {
    /// Ports that return no data.
    pub fn fixtures() -> Self {
        Self {
            jobs: Arc::new(FixtureJobSource),
            applications: Arc::new(FixtureApplicationSource),
            notifications: Arc::new(FixtureNotificationSource),
            messages: Arc::new(FixtureMessageSource),
            ratings: Arc::new(FixtureRatingSource),
            payments: Arc::new(FixturePaymentSource),
        }
    }
}

/// Dashboard sizing and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSettings {
    /// Recent listings shown to students.
    pub recent_jobs_limit: u32,
    /// Page size for paginated sources.
    pub page_size: u32,
    /// Upper bound on each source call.
    pub source_timeout: Option<Duration>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            recent_jobs_limit: DEFAULT_RECENT_JOBS_LIMIT,
            page_size: DEFAULT_PAGE_LIMIT,
            source_timeout: None,
        }
    }
}

/// Presentation model for either role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardModel {
    /// Student dashboard.
    Student(StudentDashboardModel),
    /// Employer dashboard.
    Employer(EmployerDashboardModel),
}

impl DashboardModel {
    /// Role the model was built for.
    pub fn role(&self) -> Role {
        match self {
            Self::Student(_) => Role::Student,
            Self::Employer(_) => Role::Employer,
        }
    }

    /// Sources that failed during the load.
    pub fn warnings(&self) -> &[SourceFailure] {
        match self {
            Self::Student(model) => &model.warnings,
            Self::Employer(model) => &model.warnings,
        }
    }
}

/// Builds dashboard models for a subject.
#[derive(Clone)]
pub struct DashboardService {
    ports: DashboardPorts,
    aggregator: PartialFailureAggregator,
    settings: DashboardSettings,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl DashboardService {
    /// Create a service over `ports`.
    pub fn new(
        ports: DashboardPorts,
        settings: DashboardSettings,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let aggregator = PartialFailureAggregator::new(AggregatorConfig {
            source_timeout: settings.source_timeout,
        });
        Self {
            ports,
            aggregator,
            settings,
            clock,
        }
    }

    /// Active settings.
    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Current time according to the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// The sources requested for `role`, in display order.
    pub fn sources_for(&self, role: Role) -> Vec<Arc<dyn DataSource>> {
        let page = PageRequest::first(self.settings.page_size);
        let ports = &self.ports;
        let leading: Arc<dyn DataSource> = match role {
            Role::Student => Arc::new(RecentJobsSource::new(
                Arc::clone(&ports.jobs),
                self.settings.recent_jobs_limit,
            )),
            Role::Employer => Arc::new(OwnedJobsSource::new(Arc::clone(&ports.jobs))),
        };

        let mut sources = vec![leading];
        if role == Role::Student {
            sources.push(Arc::new(StudentApplicationsSource::new(Arc::clone(
                &ports.applications,
            ))));
        }
        sources.push(Arc::new(NotificationsSource::new(
            Arc::clone(&ports.notifications),
            page,
        )));
        sources.push(Arc::new(UnreadMessagesSource::new(Arc::clone(
            &ports.messages,
        ))));
        sources.push(Arc::new(RatingsSource::new(Arc::clone(&ports.ratings), page)));
        sources.push(Arc::new(PaymentsSource::new(
            Arc::clone(&ports.payments),
            page,
        )));
        sources
    }

    /// Aggregate the student sources and derive the student model.
    ///
    /// # Errors
    ///
    /// Only [`AggregationError`]; individual source failures are reported in
    /// the model's warnings.
    pub async fn build_student_dashboard(
        &self,
        subject: &SubjectId,
    ) -> Result<StudentDashboardModel, AggregationError> {
        let composite = self
            .aggregator
            .aggregate(subject, &self.sources_for(Role::Student))
            .await?;
        Ok(StudentDashboardModel::from_composite(&composite, self.now()))
    }

    /// Aggregate the employer sources and derive the employer model.
    ///
    /// # Errors
    ///
    /// Only [`AggregationError`]; individual source failures are reported in
    /// the model's warnings.
    pub async fn build_employer_dashboard(
        &self,
        subject: &SubjectId,
    ) -> Result<EmployerDashboardModel, AggregationError> {
        let composite = self
            .aggregator
            .aggregate(subject, &self.sources_for(Role::Employer))
            .await?;
        Ok(EmployerDashboardModel::from_composite(&composite))
    }

    /// Build the model matching the subject's role.
    ///
    /// # Errors
    ///
    /// See [`Self::build_student_dashboard`].
    pub async fn build(&self, subject: &Subject) -> Result<DashboardModel, AggregationError> {
        match subject.role() {
            Role::Student => self
                .build_student_dashboard(subject.id())
                .await
                .map(DashboardModel::Student),
            Role::Employer => self
                .build_employer_dashboard(subject.id())
                .await
                .map(DashboardModel::Employer),
        }
    }

    /// Fetch fresh unread counts, keeping `previous` values for any count
    /// whose source fails.
    pub async fn poll_unread(&self, subject: &SubjectId, previous: UnreadCounts) -> UnreadCounts {
        let (notifications, messages) = tokio::join!(
            self.ports.notifications.unread_count(subject),
            self.ports.messages.list_unread(subject),
        );

        let notifications = notifications.unwrap_or_else(|error| {
            warn!(subject_id = %subject, error = %error, "unread notification poll failed");
            previous.notifications
        });
        let messages = match messages {
            Ok(messages) => u32::try_from(messages.len()).unwrap_or(u32::MAX),
            Err(error) => {
                warn!(subject_id = %subject, error = %error, "unread message poll failed");
                previous.messages
            }
        };

        UnreadCounts {
            notifications,
            messages,
            polled_at: Some(self.now()),
        }
    }
}

#[cfg(test)]
mod tests;
