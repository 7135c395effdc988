//! Integration tests for saved selections persisted to a directory.

use std::sync::Arc;

use marketplace::domain::{JobId, SavedSelectionStore};
use marketplace::outbound::storage::FileKeyValueStore;
use marketplace::test_support::{sample_employer, sample_student};
use rstest::rstest;
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> SavedSelectionStore<FileKeyValueStore> {
    let root = camino::Utf8Path::from_path(dir.path()).expect("temp dir should be UTF-8");
    let storage = FileKeyValueStore::open(root).expect("store should open");
    SavedSelectionStore::new(Arc::new(storage))
}

#[rstest]
fn toggled_selection_survives_reopening() {
    let dir = TempDir::new().expect("temp dir");
    let student = sample_student();
    let listing = JobId::new("job-3");

    let store = open_store(&dir);
    assert!(store.toggle(&student, &listing).expect("toggle on"));
    assert!(store.save(&student, &JobId::new("job-1")).expect("save"));
    drop(store);

    let reopened = open_store(&dir);
    assert!(reopened.is_saved(&student, &listing));
    assert_eq!(
        reopened.saved_ids(&student).expect("saved ids"),
        [JobId::new("job-3"), JobId::new("job-1")]
    );

    assert!(!reopened.toggle(&student, &listing).expect("toggle off"));
    assert!(!reopened.is_saved(&student, &listing));
    assert_eq!(
        reopened.saved_ids(&student).expect("saved ids"),
        [JobId::new("job-1")]
    );
}

#[rstest]
fn subjects_do_not_share_selections() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir);
    let listing = JobId::new("job-5");

    store
        .save(&sample_student(), &listing)
        .expect("save for student");

    assert!(store.is_saved(&sample_student(), &listing));
    assert!(!store.is_saved(&sample_employer(), &listing));
    assert!(
        store
            .saved_ids(&sample_employer())
            .expect("saved ids")
            .is_empty()
    );
}

#[rstest]
fn long_subject_ids_can_save_listings() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir);
    let subject = marketplace::test_support::subject_id(&"s".repeat(200));
    let listing = JobId::new("job-1");

    assert!(store.toggle(&subject, &listing).expect("toggle on"));

    assert!(store.is_saved(&subject, &listing));
    assert_eq!(store.saved_ids(&subject).expect("saved ids"), [listing]);
}
