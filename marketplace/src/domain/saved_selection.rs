//! Per-subject saved job listings over durable key-value storage.
//!
//! Each subject's saved ids live under one key as a JSON array in insertion
//! order. Every mutation rewrites the whole array; two toggles racing on the
//! same subject resolve as last write wins.

use std::sync::Arc;

use tracing::{debug, warn};

use super::ports::{DurableKeyValue, KeyValueError};
use super::{JobId, SubjectId};

const KEY_PREFIX: &str = "saved-jobs:";

/// Errors from [`SavedSelectionStore`]. The stored selection is unchanged
/// whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SavedSelectionError {
    /// Reading the stored selection failed.
    #[error("failed to read saved jobs")]
    Read {
        /// Storage failure.
        source: KeyValueError,
    },
    /// Writing the updated selection failed.
    #[error("failed to write saved jobs")]
    Write {
        /// Storage failure.
        source: KeyValueError,
    },
    /// The stored value is not a JSON list of ids.
    #[error("saved jobs under {key} are corrupt: {message}")]
    Corrupt {
        /// Storage key holding the value.
        key: String,
        /// Decoder message.
        message: String,
    },
    /// The updated selection could not be serialised.
    #[error("saved jobs under {key} could not be encoded: {message}")]
    Encode {
        /// Storage key the value was meant for.
        key: String,
        /// Encoder message.
        message: String,
    },
}

/// Saved-job membership for any number of subjects.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use marketplace::domain::{JobId, SavedSelectionStore, SubjectId};
/// use marketplace::outbound::storage::InMemoryKeyValueStore;
///
/// let store = SavedSelectionStore::new(Arc::new(InMemoryKeyValueStore::new()));
/// let subject = SubjectId::new("student-1").expect("valid id");
/// let job = JobId::new("job-42");
///
/// assert!(store.toggle(&subject, &job).expect("saved"));
/// assert!(store.is_saved(&subject, &job));
/// assert!(!store.toggle(&subject, &job).expect("unsaved"));
/// ```
#[derive(Debug)]
pub struct SavedSelectionStore<S: ?Sized> {
    storage: Arc<S>,
}

impl<S: ?Sized> Clone for SavedSelectionStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S> SavedSelectionStore<S>
where
    S: DurableKeyValue + ?Sized,
{
    /// Store selections in `storage`.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Storage key holding `subject`'s selection.
    pub fn storage_key(subject: &SubjectId) -> String {
        format!("{KEY_PREFIX}{subject}")
    }

    /// Saved ids in the order they were saved.
    ///
    /// # Errors
    ///
    /// [`SavedSelectionError::Read`] or [`SavedSelectionError::Corrupt`].
    pub fn saved_ids(&self, subject: &SubjectId) -> Result<Vec<JobId>, SavedSelectionError> {
        let key = Self::storage_key(subject);
        let Some(raw) = self
            .storage
            .get(&key)
            .map_err(|source| SavedSelectionError::Read { source })?
        else {
            return Ok(Vec::new());
        };

        let stored: Vec<JobId> =
            serde_json::from_str(&raw).map_err(|err| SavedSelectionError::Corrupt {
                key,
                message: err.to_string(),
            })?;
        let mut ids: Vec<JobId> = Vec::with_capacity(stored.len());
        for id in stored {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Whether `listing` is saved. Storage failures read as "not saved".
    pub fn is_saved(&self, subject: &SubjectId, listing: &JobId) -> bool {
        match self.saved_ids(subject) {
            Ok(ids) => ids.contains(listing),
            Err(error) => {
                warn!(subject_id = %subject, job_id = %listing, error = %error, "saved jobs unreadable");
                false
            }
        }
    }

    /// Add `listing`; returns whether the selection changed.
    ///
    /// # Errors
    ///
    /// Any [`SavedSelectionError`]; the selection is then unchanged.
    pub fn save(&self, subject: &SubjectId, listing: &JobId) -> Result<bool, SavedSelectionError> {
        let mut ids = self.saved_ids(subject)?;
        if ids.contains(listing) {
            return Ok(false);
        }
        ids.push(listing.clone());
        self.write(subject, &ids)?;
        Ok(true)
    }

    /// Remove `listing`; returns whether the selection changed.
    ///
    /// # Errors
    ///
    /// Any [`SavedSelectionError`]; the selection is then unchanged.
    pub fn unsave(
        &self,
        subject: &SubjectId,
        listing: &JobId,
    ) -> Result<bool, SavedSelectionError> {
        let mut ids = self.saved_ids(subject)?;
        let before = ids.len();
        ids.retain(|id| id != listing);
        if ids.len() == before {
            return Ok(false);
        }
        self.write(subject, &ids)?;
        Ok(true)
    }

    /// Flip membership of `listing` and return the new state.
    ///
    /// # Errors
    ///
    /// Any [`SavedSelectionError`]; the selection is then unchanged and the
    /// caller should keep showing the previous state.
    pub fn toggle(
        &self,
        subject: &SubjectId,
        listing: &JobId,
    ) -> Result<bool, SavedSelectionError> {
        let mut ids = self.saved_ids(subject)?;
        let saved = match ids.iter().position(|id| id == listing) {
            Some(index) => {
                ids.remove(index);
                false
            }
            None => {
                ids.push(listing.clone());
                true
            }
        };
        self.write(subject, &ids)?;
        debug!(subject_id = %subject, job_id = %listing, saved, "saved job toggled");
        Ok(saved)
    }

    fn write(&self, subject: &SubjectId, ids: &[JobId]) -> Result<(), SavedSelectionError> {
        let key = Self::storage_key(subject);
        let encoded = serde_json::to_string(ids).map_err(|err| SavedSelectionError::Encode {
            key: key.clone(),
            message: err.to_string(),
        })?;
        self.storage
            .set(&key, &encoded)
            .map_err(|source| SavedSelectionError::Write { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockDurableKeyValue;
    use crate::outbound::storage::InMemoryKeyValueStore;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> SavedSelectionStore<InMemoryKeyValueStore> {
        SavedSelectionStore::new(Arc::new(InMemoryKeyValueStore::new()))
    }

    #[fixture]
    fn subject() -> SubjectId {
        SubjectId::new("student-1").expect("valid id")
    }

    #[rstest]
    fn toggle_twice_restores_membership(
        store: SavedSelectionStore<InMemoryKeyValueStore>,
        subject: SubjectId,
    ) {
        let job = JobId::new("job-3");
        assert!(!store.is_saved(&subject, &job));

        assert!(store.toggle(&subject, &job).expect("first toggle"));
        assert!(store.is_saved(&subject, &job));

        assert!(!store.toggle(&subject, &job).expect("second toggle"));
        assert!(!store.is_saved(&subject, &job));
    }

    #[rstest]
    fn save_and_unsave_are_idempotent(
        store: SavedSelectionStore<InMemoryKeyValueStore>,
        subject: SubjectId,
    ) {
        let job = JobId::new("job-1");
        assert!(store.save(&subject, &job).expect("save"));
        assert!(!store.save(&subject, &job).expect("save again"));
        assert_eq!(store.saved_ids(&subject).expect("ids"), vec![job.clone()]);

        assert!(store.unsave(&subject, &job).expect("unsave"));
        assert!(!store.unsave(&subject, &job).expect("unsave again"));
        assert!(store.saved_ids(&subject).expect("ids").is_empty());
    }

    #[rstest]
    fn selections_are_scoped_per_subject(store: SavedSelectionStore<InMemoryKeyValueStore>) {
        let first = SubjectId::new("student-1").expect("valid id");
        let second = SubjectId::new("student-2").expect("valid id");
        let job = JobId::new("job-8");

        store.toggle(&first, &job).expect("toggle");

        assert!(store.is_saved(&first, &job));
        assert!(!store.is_saved(&second, &job));
    }

    #[rstest]
    fn stored_value_is_an_ordered_json_list(subject: SubjectId) {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let store = SavedSelectionStore::new(Arc::clone(&storage));
        for id in ["job-5", "job-1", "job-3"] {
            store.toggle(&subject, &JobId::new(id)).expect("toggle");
        }

        let raw = storage
            .get("saved-jobs:student-1")
            .expect("read")
            .expect("value present");
        assert_eq!(raw, r#"["job-5","job-1","job-3"]"#);
    }

    #[rstest]
    fn duplicate_stored_ids_are_collapsed(subject: SubjectId) {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        storage
            .set("saved-jobs:student-1", r#"["job-1","job-2","job-1"]"#)
            .expect("seed");
        let store = SavedSelectionStore::new(storage);

        let ids = store.saved_ids(&subject).expect("ids");
        assert_eq!(ids, vec![JobId::new("job-1"), JobId::new("job-2")]);
    }

    #[rstest]
    fn corrupt_value_is_reported_and_reads_as_unsaved(subject: SubjectId) {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        storage.set("saved-jobs:student-1", "{not json").expect("seed");
        let store = SavedSelectionStore::new(storage);
        let job = JobId::new("job-1");

        assert!(!store.is_saved(&subject, &job));
        let error = store.toggle(&subject, &job).expect_err("corrupt");
        assert!(matches!(error, SavedSelectionError::Corrupt { .. }));
    }

    #[rstest]
    fn write_failure_leaves_state_unchanged(subject: SubjectId) {
        let mut storage = MockDurableKeyValue::new();
        storage
            .expect_get()
            .returning(|_| Ok(Some(r#"["job-1"]"#.to_owned())));
        storage
            .expect_set()
            .times(1)
            .returning(|key, _| Err(KeyValueError::write(key, "disk full")));
        let store = SavedSelectionStore::new(Arc::new(storage));
        let job = JobId::new("job-1");

        let error = store.toggle(&subject, &job).expect_err("write fails");

        assert_eq!(error, SavedSelectionError::Write {
            source: KeyValueError::write("saved-jobs:student-1", "disk full"),
        });
        assert!(store.is_saved(&subject, &job));
    }

    #[rstest]
    fn read_failure_is_surfaced(subject: SubjectId) {
        let mut storage = MockDurableKeyValue::new();
        storage
            .expect_get()
            .returning(|_| Err(KeyValueError::unavailable("locked")));
        storage.expect_set().never();
        let store = SavedSelectionStore::new(Arc::new(storage));

        let error = store
            .toggle(&subject, &JobId::new("job-1"))
            .expect_err("read fails");
        assert!(matches!(error, SavedSelectionError::Read { .. }));
    }
}
