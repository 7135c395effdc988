//! In-app notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification addressed to one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification identifier.
    pub id: String,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Backend category, e.g. `application` or `payment`.
    #[serde(default)]
    pub kind: String,
    /// Whether the subject has read it.
    #[serde(default)]
    pub read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Number of unread notifications in `notifications`.
pub fn count_unread(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|item| !item.read).count()
}
