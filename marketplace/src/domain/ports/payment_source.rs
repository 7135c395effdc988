//! Port for reading payments.

use async_trait::async_trait;

use crate::domain::{Payment, SubjectId};

use super::{Page, PageRequest, SourceError};

/// Read access to payments made or received by a subject.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentSource: Send + Sync {
    /// One page of payments, newest first.
    async fn list(
        &self,
        subject: &SubjectId,
        page: PageRequest,
    ) -> Result<Page<Payment>, SourceError>;
}

/// Fixture implementation with no payments.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentSource;

#[async_trait]
impl PaymentSource for FixturePaymentSource {
    async fn list(
        &self,
        _subject: &SubjectId,
        page: PageRequest,
    ) -> Result<Page<Payment>, SourceError> {
        Ok(Page::empty(page))
    }
}
