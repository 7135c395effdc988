//! Presentation model for the employer dashboard.

use serde::{Deserialize, Serialize};

use crate::domain::{
    CompositeDashboard, JobListing, ListingStatus, Message, Notification, Payment, Rating,
    RatingStats, SourceFailure, SourceKey, completed_amount, count_unread,
};

/// Sources an employer dashboard requests, in display order.
pub const EMPLOYER_SOURCES: [SourceKey; 5] = [
    SourceKey::MyJobs,
    SourceKey::Notifications,
    SourceKey::UnreadMessages,
    SourceKey::Ratings,
    SourceKey::Payments,
];

/// Everything the employer dashboard screen renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerDashboardModel {
    /// Listings the employer owns.
    pub my_jobs: Vec<JobListing>,
    /// Number of owned listings.
    pub total_job_count: usize,
    /// Owned listings in the active state.
    pub active_job_count: usize,
    /// Owned listings that reached their applicant cap.
    pub full_job_count: usize,
    /// Applicants summed across owned listings.
    pub total_applicants: u64,
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
    /// Payments made.
    pub payments: Vec<Payment>,
    /// Sum of completed payment amounts.
    pub completed_payments_total: u64,
    /// Sources that could not be loaded.
    pub warnings: Vec<SourceFailure>,
}

impl EmployerDashboardModel {
    /// Derive the model from a composite.
    pub fn from_composite(composite: &CompositeDashboard) -> Self {
        let my_jobs = composite.items::<JobListing>(SourceKey::MyJobs).to_vec();
        let notifications = composite
            .items::<Notification>(SourceKey::Notifications)
            .to_vec();
        let unread_messages = composite
            .items::<Message>(SourceKey::UnreadMessages)
            .to_vec();
        let ratings = composite.items::<Rating>(SourceKey::Ratings).to_vec();
        let payments = composite.items::<Payment>(SourceKey::Payments).to_vec();

        Self {
            total_job_count: my_jobs.len(),
            active_job_count: my_jobs
                .iter()
                .filter(|job| job.status == ListingStatus::Active)
                .count(),
            full_job_count: my_jobs.iter().filter(|job| job.is_full()).count(),
            total_applicants: total_applicants(&my_jobs),
            unread_notification_count: count_unread(&notifications),
            unread_message_count: unread_messages.len(),
            rating_stats: RatingStats::from_ratings(&ratings),
            completed_payments_total: completed_amount(&payments),
            warnings: composite.warnings(),
            my_jobs,
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

/// Applicants summed across `jobs`.
pub fn total_applicants(jobs: &[JobListing]) -> u64 {
    jobs.iter().map(|job| u64::from(job.applicant_count)).sum()
}
