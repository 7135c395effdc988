//! Job applications and per-status counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{JobId, SubjectId};

/// Lifecycle state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    /// Sent, not yet looked at.
    Submitted,
    /// The employer is reviewing it.
    UnderReview,
    /// Shortlisted for a decision.
    Shortlisted,
    /// Chosen for the job.
    Selected,
    /// Turned down.
    Rejected,
    /// Pulled back by the student.
    Withdrawn,
}

impl ApplicationStatus {
    /// Every status in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Submitted,
        Self::UnderReview,
        Self::Shortlisted,
        Self::Selected,
        Self::Rejected,
        Self::Withdrawn,
    ];
}

/// A student's application to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Application identifier.
    pub id: String,
    /// Listing applied to.
    pub job_id: JobId,
    /// Applying student.
    pub student_id: SubjectId,
    /// Current state.
    pub status: ApplicationStatus,
    /// Submission time.
    pub applied_at: DateTime<Utc>,
    /// Optional note sent with the application.
    #[serde(default)]
    pub cover_note: Option<String>,
}

/// Number of applications in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatusCounts {
    /// Applications awaiting review.
    pub submitted: usize,
    /// Applications under review.
    pub under_review: usize,
    /// Shortlisted applications.
    pub shortlisted: usize,
    /// Successful applications.
    pub selected: usize,
    /// Rejected applications.
    pub rejected: usize,
    /// Withdrawn applications.
    pub withdrawn: usize,
}

impl ApplicationStatusCounts {
    /// Tally `applications` by status.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::{ApplicationStatus, ApplicationStatusCounts};
    ///
    /// let counts = ApplicationStatusCounts::default();
    /// assert_eq!(counts.get(ApplicationStatus::Selected), 0);
    /// assert_eq!(counts.total(), 0);
    /// ```
    pub fn from_applications(applications: &[Application]) -> Self {
        applications
            .iter()
            .fold(Self::default(), |mut counts, application| {
                *counts.slot_mut(application.status) += 1;
                counts
            })
    }

    /// Count for one status.
    pub fn get(&self, status: ApplicationStatus) -> usize {
        match status {
            ApplicationStatus::Submitted => self.submitted,
            ApplicationStatus::UnderReview => self.under_review,
            ApplicationStatus::Shortlisted => self.shortlisted,
            ApplicationStatus::Selected => self.selected,
            ApplicationStatus::Rejected => self.rejected,
            ApplicationStatus::Withdrawn => self.withdrawn,
        }
    }

    /// Sum across all statuses.
    pub fn total(&self) -> usize {
        ApplicationStatus::ALL
            .into_iter()
            .map(|status| self.get(status))
            .sum()
    }

    fn slot_mut(&mut self, status: ApplicationStatus) -> &mut usize {
        match status {
            ApplicationStatus::Submitted => &mut self.submitted,
            ApplicationStatus::UnderReview => &mut self.under_review,
            ApplicationStatus::Shortlisted => &mut self.shortlisted,
            ApplicationStatus::Selected => &mut self.selected,
            ApplicationStatus::Rejected => &mut self.rejected,
            ApplicationStatus::Withdrawn => &mut self.withdrawn,
        }
    }
}
