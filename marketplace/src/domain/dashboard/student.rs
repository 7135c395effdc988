//! Presentation model for the student dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Application, ApplicationStatusCounts, CompositeDashboard, JobListing, Message, Notification,
    Payment, Rating, RatingStats, SourceFailure, SourceKey, count_unread, total_amount,
};

/// Sources a student dashboard requests, in display order.
pub const STUDENT_SOURCES: [SourceKey; 6] = [
    SourceKey::RecentJobs,
    SourceKey::Applications,
    SourceKey::Notifications,
    SourceKey::UnreadMessages,
    SourceKey::Ratings,
    SourceKey::Payments,
];

/// Everything the student dashboard screen renders.
///
/// Failed sources contribute empty lists and zero counts; they are named in
/// `warnings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboardModel {
    /// Latest listings.
    pub recent_jobs: Vec<JobListing>,
    /// Recent listings still accepting applications.
    pub open_recent_job_count: usize,
    /// The student's applications.
    pub applications: Vec<Application>,
    /// Applications per status.
    pub application_counts: ApplicationStatusCounts,
    /// Latest notifications.
    pub notifications: Vec<Notification>,
    /// Unread notifications among `notifications`.
    pub unread_notification_count: usize,
    /// Unread direct messages.
    pub unread_messages: Vec<Message>,
    /// Number of unread direct messages.
    pub unread_message_count: usize,
    /// Ratings received.
    pub ratings: Vec<Rating>,
    /// Average and count of `ratings`.
    pub rating_stats: RatingStats,
    /// Payments received.
    pub payments: Vec<Payment>,
    /// Sum of every payment amount regardless of status.
    pub payments_total: u64,
    /// Sources that could not be loaded.
    pub warnings: Vec<SourceFailure>,
}

impl StudentDashboardModel {
    /// Derive the model from a composite, evaluating deadlines at `now`.
    pub fn from_composite(composite: &CompositeDashboard, now: DateTime<Utc>) -> Self {
        let recent_jobs = composite.items::<JobListing>(SourceKey::RecentJobs).to_vec();
        let applications = composite.items::<Application>(SourceKey::Applications).to_vec();
        let notifications = composite
            .items::<Notification>(SourceKey::Notifications)
            .to_vec();
        let unread_messages = composite
            .items::<Message>(SourceKey::UnreadMessages)
            .to_vec();
        let ratings = composite.items::<Rating>(SourceKey::Ratings).to_vec();
        let payments = composite.items::<Payment>(SourceKey::Payments).to_vec();

        Self {
            open_recent_job_count: recent_jobs
                .iter()
                .filter(|job| job.is_open_at(now))
                .count(),
            application_counts: ApplicationStatusCounts::from_applications(&applications),
            unread_notification_count: count_unread(&notifications),
            unread_message_count: unread_messages.len(),
            rating_stats: RatingStats::from_ratings(&ratings),
            payments_total: total_amount(&payments),
            warnings: composite.warnings(),
            recent_jobs,
            applications,
            notifications,
            unread_messages,
            ratings,
            payments,
        }
    }

    /// Human-readable notices for the warning banner.
    pub fn warning_notices(&self) -> Vec<String> {
        self.warnings.iter().map(SourceFailure::notice).collect()
    }
}
