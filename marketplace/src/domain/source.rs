//! Per-source results and the composite produced by one aggregation.
//!
//! A [`CompositeDashboard`] holds exactly one [`SourceResult`] per requested
//! source, in request order. It is immutable: refreshing a dashboard builds a
//! new composite rather than patching the old one.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Application, JobListing, Message, Notification, Payment, Rating, SubjectId};

/// Identity of one dashboard data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKey {
    /// Latest listings shown to students.
    RecentJobs,
    /// Listings owned by an employer.
    MyJobs,
    /// A student's applications.
    Applications,
    /// Notifications for the subject.
    Notifications,
    /// Unread direct messages.
    UnreadMessages,
    /// Ratings received by the subject.
    Ratings,
    /// Payments made or received by the subject.
    Payments,
}

impl SourceKey {
    /// Stable snake-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecentJobs => "recent_jobs",
            Self::MyJobs => "my_jobs",
            Self::Applications => "applications",
            Self::Notifications => "notifications",
            Self::UnreadMessages => "unread_messages",
            Self::Ratings => "ratings",
            Self::Payments => "payments",
        }
    }

    /// Human-readable label for warnings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RecentJobs => "recent jobs",
            Self::MyJobs => "your job postings",
            Self::Applications => "applications",
            Self::Notifications => "notifications",
            Self::UnreadMessages => "unread messages",
            Self::Ratings => "ratings",
            Self::Payments => "payments",
        }
    }

    /// Whether `payload` is the shape this source produces.
    pub fn accepts(&self, payload: &SourcePayload) -> bool {
        matches!(
            (self, payload),
            (Self::RecentJobs | Self::MyJobs, SourcePayload::Jobs(_))
                | (Self::Applications, SourcePayload::Applications(_))
                | (Self::Notifications, SourcePayload::Notifications(_))
                | (Self::UnreadMessages, SourcePayload::Messages(_))
                | (Self::Ratings, SourcePayload::Ratings(_))
                | (Self::Payments, SourcePayload::Payments(_))
        )
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad category of a source failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network or server-side failure.
    Unavailable,
    /// Credentials missing, expired, or insufficient.
    Unauthorized,
    /// The backend has no such resource.
    NotFound,
    /// The backend refused the request as malformed.
    Rejected,
    /// The response could not be decoded.
    Decode,
    /// No response in time.
    Timeout,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unavailable => "unavailable",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Rejected => "rejected",
            Self::Decode => "decode",
            Self::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

/// Error record for a source that did not produce data.
///
/// Dashboards surface these as non-blocking warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{key} failed ({kind}): {message}")]
pub struct SourceFailure {
    /// Which source failed.
    pub key: SourceKey,
    /// Failure category.
    pub kind: FailureKind,
    /// Adapter-supplied detail.
    pub message: String,
}

impl SourceFailure {
    /// Build a failure record.
    pub fn new(key: SourceKey, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            key,
            kind,
            message: message.into(),
        }
    }

    /// Short user-facing notice naming the unavailable data.
    pub fn notice(&self) -> String {
        format!("{} are currently unavailable", self.key.label())
    }
}

/// Outcome of one source call: data or an explicit failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum SourceResult<T> {
    /// The source produced data.
    Ok(T),
    /// The source failed; no data.
    Failed(SourceFailure),
}

impl<T> SourceResult<T> {
    /// Whether data is present.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Whether the source failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Borrow the data, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ok(data) => Some(data),
            Self::Failed(_) => None,
        }
    }

    /// Borrow the failure, if any.
    pub fn failure(&self) -> Option<&SourceFailure> {
        match self {
            Self::Ok(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Convert the data while keeping any failure.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SourceResult<U> {
        match self {
            Self::Ok(data) => SourceResult::Ok(f(data)),
            Self::Failed(failure) => SourceResult::Failed(failure),
        }
    }
}

/// Data returned by one source, tagged by collection type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum SourcePayload {
    /// Job listings.
    Jobs(Vec<JobListing>),
    /// Applications.
    Applications(Vec<Application>),
    /// Notifications.
    Notifications(Vec<Notification>),
    /// Direct messages.
    Messages(Vec<Message>),
    /// Ratings.
    Ratings(Vec<Rating>),
    /// Payments.
    Payments(Vec<Payment>),
}

impl SourcePayload {
    /// Number of records carried.
    pub fn len(&self) -> usize {
        match self {
            Self::Jobs(items) => items.len(),
            Self::Applications(items) => items.len(),
            Self::Notifications(items) => items.len(),
            Self::Messages(items) => items.len(),
            Self::Ratings(items) => items.len(),
            Self::Payments(items) => items.len(),
        }
    }

    /// Whether the payload carries no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Record types that can be read back out of a [`SourcePayload`].
pub trait PayloadItem: Sized {
    /// Borrow the records when `payload` holds this type.
    fn from_payload(payload: &SourcePayload) -> Option<&[Self]>;
}

macro_rules! payload_item {
    ($item:ty => $variant:ident) => {
        impl PayloadItem for $item {
            fn from_payload(payload: &SourcePayload) -> Option<&[Self]> {
                match payload {
                    SourcePayload::$variant(items) => Some(items.as_slice()),
                    _ => None,
                }
            }
        }

        impl From<Vec<$item>> for SourcePayload {
            fn from(items: Vec<$item>) -> Self {
                Self::$variant(items)
            }
        }
    };
}

payload_item!(JobListing => Jobs);
payload_item!(Application => Applications);
payload_item!(Notification => Notifications);
payload_item!(Message => Messages);
payload_item!(Rating => Ratings);
payload_item!(Payment => Payments);

/// One source's slot in a composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    /// Which source.
    pub key: SourceKey,
    /// What it produced.
    pub result: SourceResult<SourcePayload>,
}

/// Per-source success/failure record of one aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeDashboard {
    subject: SubjectId,
    entries: Vec<SourceEntry>,
}

impl CompositeDashboard {
    /// Assemble a composite from settled entries, in request order.
    pub fn new(subject: SubjectId, entries: Vec<SourceEntry>) -> Self {
        Self { subject, entries }
    }

    /// The subject the data belongs to.
    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    /// Entries in request order.
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the composite has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Result recorded for `key`.
    pub fn get(&self, key: SourceKey) -> Option<&SourceResult<SourcePayload>> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.result)
    }

    /// Records from `key`, or an empty slice when the source failed, was not
    /// requested, or produced another record type.
    pub fn items<T: PayloadItem>(&self, key: SourceKey) -> &[T] {
        self.get(key)
            .and_then(SourceResult::data)
            .and_then(T::from_payload)
            .unwrap_or(&[])
    }

    /// Failures in request order.
    pub fn failures(&self) -> impl Iterator<Item = &SourceFailure> {
        self.entries
            .iter()
            .filter_map(|entry| entry.result.failure())
    }

    /// Owned copy of every failure, for presentation models.
    pub fn warnings(&self) -> Vec<SourceFailure> {
        self.failures().cloned().collect()
    }

    /// Whether every source produced data.
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|entry| entry.result.is_ok())
    }
}
