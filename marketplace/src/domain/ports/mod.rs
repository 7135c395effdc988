//! Ports at the hexagonal boundary of the marketplace client.
//!
//! Read ports are async and fail with [`SourceError`]; the durable key-value
//! port is synchronous and fails with [`KeyValueError`].

mod macros;
pub(crate) use macros::define_port_error;

mod application_source;
mod durable_key_value;
mod job_source;
mod message_source;
mod notification_source;
mod page;
mod payment_source;
mod rating_source;
mod source_error;

#[cfg(test)]
pub use application_source::MockApplicationSource;
pub use application_source::{ApplicationSource, FixtureApplicationSource};
#[cfg(test)]
pub use durable_key_value::MockDurableKeyValue;
pub use durable_key_value::{DurableKeyValue, KeyValueError};
#[cfg(test)]
pub use job_source::MockJobSource;
pub use job_source::{FixtureJobSource, JobSource};
#[cfg(test)]
pub use message_source::MockMessageSource;
pub use message_source::{FixtureMessageSource, MessageSource};
#[cfg(test)]
pub use notification_source::MockNotificationSource;
pub use notification_source::{FixtureNotificationSource, NotificationSource};
pub use page::{DEFAULT_PAGE_LIMIT, Page, PageRequest};
#[cfg(test)]
pub use payment_source::MockPaymentSource;
pub use payment_source::{FixturePaymentSource, PaymentSource};
#[cfg(test)]
pub use rating_source::MockRatingSource;
pub use rating_source::{FixtureRatingSource, RatingSource};
pub use source_error::SourceError;
