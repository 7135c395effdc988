//! Direct messages between subjects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SubjectId;

/// One direct message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message identifier.
    pub id: String,
    /// Author.
    pub sender_id: SubjectId,
    /// Addressee.
    pub recipient_id: SubjectId,
    /// Message text.
    pub body: String,
    /// Whether the recipient has read it.
    #[serde(default)]
    pub read: bool,
    /// Send time.
    pub sent_at: DateTime<Utc>,
}
