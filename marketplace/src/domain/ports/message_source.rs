//! Port for reading direct messages.

use async_trait::async_trait;

use crate::domain::{Message, SubjectId};

use super::SourceError;

/// Read access to a subject's messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Messages addressed to `subject` that are still unread.
    async fn list_unread(&self, subject: &SubjectId) -> Result<Vec<Message>, SourceError>;
}

/// Fixture implementation with no messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessageSource;

#[async_trait]
impl MessageSource for FixtureMessageSource {
    async fn list_unread(&self, _subject: &SubjectId) -> Result<Vec<Message>, SourceError> {
        Ok(Vec::new())
    }
}
