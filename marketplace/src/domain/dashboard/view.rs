//! Dashboard screen lifecycle: load, refresh, unread polling, dispose.
//!
//! Refreshes on one view are serialised through an async gate. Each call takes
//! a ticket; a call whose ticket is already covered by a snapshot published
//! while it waited returns that snapshot instead of fetching again, so any
//! number of stacked requests collapse into a single follow-up run.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::{DashboardModel, DashboardService};
use crate::domain::Subject;
use crate::domain::aggregator::AggregationError;

/// Errors raised by [`DashboardView`] lifecycle calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    /// The view was disposed; its results are no longer observed.
    #[error("dashboard view has been disposed")]
    Disposed,
    /// Unread polling needs a non-zero interval.
    #[error("unread poll interval must be greater than zero")]
    InvalidPollInterval,
    /// The source list was malformed.
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// One published dashboard model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Highest refresh request this snapshot answers; strictly increasing.
    pub generation: u64,
    /// When the model was derived.
    pub refreshed_at: DateTime<Utc>,
    /// The model itself.
    pub model: DashboardModel,
}

/// Latest unread badge counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCounts {
    /// Unread notifications.
    pub notifications: u32,
    /// Unread direct messages.
    pub messages: u32,
    /// Time of the last poll, if any has run.
    pub polled_at: Option<DateTime<Utc>>,
}

struct UnreadPoller {
    handle: JoinHandle<()>,
}

impl Drop for UnreadPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A dashboard bound to one subject for the lifetime of a screen.
pub struct DashboardView {
    service: Arc<DashboardService>,
    subject: Subject,
    requested: AtomicU64,
    gate: tokio::sync::Mutex<u64>,
    snapshot: watch::Sender<Option<Arc<DashboardSnapshot>>>,
    unread: Arc<watch::Sender<UnreadCounts>>,
    disposed: AtomicBool,
    poller: Mutex<Option<UnreadPoller>>,
}

impl DashboardView {
    /// Bind a new view to `subject`. Nothing is fetched until [`Self::load`].
    pub fn new(service: Arc<DashboardService>, subject: Subject) -> Self {
        let (snapshot, _) = watch::channel(None);
        let (unread, _) = watch::channel(UnreadCounts::default());
        Self {
            service,
            subject,
            requested: AtomicU64::new(0),
            gate: tokio::sync::Mutex::new(0),
            snapshot,
            unread: Arc::new(unread),
            disposed: AtomicBool::new(false),
            poller: Mutex::new(None),
        }
    }

    /// The subject this view belongs to.
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Whether [`Self::dispose`] has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Most recently published snapshot.
    pub fn current(&self) -> Option<Arc<DashboardSnapshot>> {
        self.snapshot.borrow().clone()
    }

    /// Receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<DashboardSnapshot>>> {
        self.snapshot.subscribe()
    }

    /// Latest unread counts.
    pub fn unread_counts(&self) -> UnreadCounts {
        *self.unread.borrow()
    }

    /// Receiver notified after every unread poll.
    pub fn subscribe_unread(&self) -> watch::Receiver<UnreadCounts> {
        self.unread.subscribe()
    }

    /// Initial load: returns the current snapshot if one exists, otherwise
    /// performs a refresh.
    ///
    /// # Errors
    ///
    /// See [`Self::refresh`].
    pub async fn load(&self) -> Result<Arc<DashboardSnapshot>, DashboardError> {
        self.ensure_live()?;
        match self.current() {
            Some(snapshot) => Ok(snapshot),
            None => self.refresh().await,
        }
    }

    /// Re-aggregate every source and publish a new snapshot.
    ///
    /// Calls made while another refresh is running wait for it, then share a
    /// single follow-up run.
    ///
    /// # Errors
    ///
    /// [`DashboardError::Disposed`] if the view is disposed before or during
    /// the refresh; the fetched result is then discarded.
    pub async fn refresh(&self) -> Result<Arc<DashboardSnapshot>, DashboardError> {
        self.ensure_live()?;
        let ticket = self.requested.fetch_add(1, Ordering::SeqCst) + 1;
        let mut covered = self.gate.lock().await;

        if *covered >= ticket {
            if let Some(snapshot) = self.current() {
                debug!(
                    subject_id = %self.subject.id(),
                    ticket,
                    generation = snapshot.generation,
                    "refresh collapsed into newer run"
                );
                return Ok(snapshot);
            }
        }
        self.ensure_live()?;

        let generation = self.requested.load(Ordering::SeqCst);
        let model = self.service.build(&self.subject).await?;
        if self.is_disposed() {
            debug!(subject_id = %self.subject.id(), generation, "discarding result of disposed view");
            return Err(DashboardError::Disposed);
        }

        let snapshot = Arc::new(DashboardSnapshot {
            generation,
            refreshed_at: self.service.now(),
            model,
        });
        self.snapshot.send_replace(Some(Arc::clone(&snapshot)));
        *covered = generation;
        info!(
            subject_id = %self.subject.id(),
            role = %self.subject.role(),
            generation,
            warnings = snapshot.model.warnings().len(),
            "dashboard refreshed"
        );
        Ok(snapshot)
    }

    /// Start polling unread counts every `interval`, replacing any running
    /// poller. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`DashboardError::Disposed`] after disposal and
    /// [`DashboardError::InvalidPollInterval`] for a zero interval.
    pub fn start_polling(&self, interval: Duration) -> Result<(), DashboardError> {
        self.ensure_live()?;
        if interval.is_zero() {
            return Err(DashboardError::InvalidPollInterval);
        }

        let service = Arc::clone(&self.service);
        let subject_id = self.subject.id().clone();
        let unread = Arc::clone(&self.unread);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let previous = *unread.borrow();
                let next = service.poll_unread(&subject_id, previous).await;
                unread.send_replace(next);
            }
        });

        let mut poller = self.lock_poller();
        // `dispose` flags the view before taking this lock.
        if self.is_disposed() {
            handle.abort();
            return Err(DashboardError::Disposed);
        }
        let replaced = poller.replace(UnreadPoller { handle });
        drop(poller);
        debug!(
            subject_id = %self.subject.id(),
            interval_ms = interval.as_millis(),
            replaced = replaced.is_some(),
            "unread polling started"
        );
        Ok(())
    }

    /// Whether an unread poller is running.
    pub fn is_polling(&self) -> bool {
        self.lock_poller()
            .as_ref()
            .is_some_and(|poller| !poller.handle.is_finished())
    }

    /// Tear the view down: stop polling and ignore any in-flight refresh.
    /// Calling it again has no effect.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let poller = self.lock_poller().take();
        info!(
            subject_id = %self.subject.id(),
            stopped_polling = poller.is_some(),
            "dashboard view disposed"
        );
        drop(poller);
    }

    fn ensure_live(&self) -> Result<(), DashboardError> {
        if self.is_disposed() {
            Err(DashboardError::Disposed)
        } else {
            Ok(())
        }
    }

    fn lock_poller(&self) -> std::sync::MutexGuard<'_, Option<UnreadPoller>> {
        self.poller.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
