//! Concurrent fan-out over independent dashboard sources.
//!
//! [`PartialFailureAggregator::aggregate`] starts every source together and
//! returns only once each one has settled. A failing source becomes a
//! [`SourceResult::Failed`] entry; it never aborts the other sources and never
//! escapes as an error. The only errors returned are for malformed source
//! lists, which are rejected before any source runs.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, warn};

use super::ports::SourceError;
use super::{CompositeDashboard, SourceEntry, SourceKey, SourcePayload, SourceResult, SubjectId};

/// One independent read contributing to a dashboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Key identifying this source within a composite.
    fn key(&self) -> SourceKey;

    /// Fetch this source's records for `subject`.
    async fn fetch(&self, subject: &SubjectId) -> Result<SourcePayload, SourceError>;
}

/// Malformed source lists passed to [`PartialFailureAggregator::aggregate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    /// No sources were supplied.
    #[error("at least one dashboard source is required")]
    EmptySourceList,
    /// The same source key appeared more than once.
    #[error("dashboard source {key} was requested more than once")]
    DuplicateSource {
        /// The repeated key.
        key: SourceKey,
    },
}

/// Aggregator tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Upper bound on each source call; `None` waits indefinitely.
    pub source_timeout: Option<Duration>,
}

/// Join/barrier over a set of [`DataSource`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialFailureAggregator {
    config: AggregatorConfig,
}

impl PartialFailureAggregator {
    /// Create an aggregator with `config`.
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Fetch every source for `subject` concurrently and collect one entry per
    /// source, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError`] when `sources` is empty or repeats a key.
    /// No source is invoked in that case.
    pub async fn aggregate(
        &self,
        subject: &SubjectId,
        sources: &[Arc<dyn DataSource>],
    ) -> Result<CompositeDashboard, AggregationError> {
        validate_sources(sources)?;

        let entries = join_all(
            sources
                .iter()
                .map(|source| self.settle(subject, source.as_ref())),
        )
        .await;

        let failed = entries.iter().filter(|entry| entry.result.is_failed()).count();
        debug!(
            subject_id = %subject,
            sources = entries.len(),
            failed,
            "dashboard aggregation settled"
        );
        Ok(CompositeDashboard::new(subject.clone(), entries))
    }

    async fn settle(&self, subject: &SubjectId, source: &dyn DataSource) -> SourceEntry {
        let key = source.key();
        let outcome = match self.config.source_timeout {
            Some(limit) => tokio::time::timeout(limit, source.fetch(subject))
                .await
                .unwrap_or_else(|_| {
                    Err(SourceError::timeout(format!(
                        "no response within {}ms",
                        limit.as_millis()
                    )))
                }),
            None => source.fetch(subject).await,
        };

        let result = match outcome {
            Ok(payload) if key.accepts(&payload) => SourceResult::Ok(payload),
            Ok(_) => SourceResult::Failed(
                SourceError::decode("source returned records of another type").into_failure(key),
            ),
            Err(error) => SourceResult::Failed(error.into_failure(key)),
        };

        if let SourceResult::Failed(failure) = &result {
            warn!(
                subject_id = %subject,
                source = %key,
                kind = %failure.kind,
                error = %failure.message,
                "dashboard source failed"
            );
        }
        SourceEntry { key, result }
    }
}

fn validate_sources(sources: &[Arc<dyn DataSource>]) -> Result<(), AggregationError> {
    if sources.is_empty() {
        return Err(AggregationError::EmptySourceList);
    }
    let mut seen = HashSet::with_capacity(sources.len());
    for source in sources {
        let key = source.key();
        if !seen.insert(key) {
            return Err(AggregationError::DuplicateSource { key });
        }
    }
    Ok(())
}
