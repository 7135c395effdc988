//! Domain types and services for the marketplace client.
//!
//! Purpose: model the records the dashboards and job search consume, the
//! per-source results of an aggregation, and the services that assemble them.
//! Transport and storage live behind the traits in [`ports`].
//!
//! Public surface:
//! - [`PartialFailureAggregator`]: concurrent fan-out that tolerates failing
//!   sources.
//! - [`DashboardService`] / [`DashboardView`]: role-specific dashboards and
//!   their lifecycle.
//! - [`filter`] / [`JobSearch`]: faceted job search.
//! - [`SavedSelectionStore`]: per-subject saved listings.

pub mod aggregator;
pub mod dashboard;
pub mod ports;
pub mod search;

mod applications;
mod jobs;
mod messages;
mod notifications;
mod payments;
mod ratings;
mod saved_selection;
mod source;
mod subject;

pub use self::aggregator::{AggregationError, AggregatorConfig, DataSource, PartialFailureAggregator};
pub use self::applications::{Application, ApplicationStatus, ApplicationStatusCounts};
pub use self::dashboard::{
    DashboardError, DashboardModel, DashboardPorts, DashboardService, DashboardSettings,
    DashboardSnapshot, DashboardView, EmployerDashboardModel, StudentDashboardModel,
    UnreadCounts,
};
pub use self::jobs::{
    JobId, JobListing, JobListingBuilder, JobType, ListingStatus, ParseJobAttributeError, PayType,
};
pub use self::messages::Message;
pub use self::notifications::{Notification, count_unread};
pub use self::payments::{Payment, PaymentStatus, completed_amount, total_amount};
pub use self::ratings::{Rating, RatingStats};
pub use self::saved_selection::{SavedSelectionError, SavedSelectionStore};
pub use self::search::{FacetSelection, JobSearch, filter, parse_pay_bound};
pub use self::source::{
    CompositeDashboard, FailureKind, PayloadItem, SourceEntry, SourceFailure, SourceKey,
    SourcePayload, SourceResult,
};
pub use self::subject::{ParseRoleError, Role, Subject, SubjectId, SubjectValidationError};
