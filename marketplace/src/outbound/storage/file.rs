//! Directory-backed key-value store.
//!
//! Each key maps to one file named by the hex SHA-256 digest of the key, so
//! any key text yields a short, filesystem-safe name. Writes go to a hidden temporary file that is then
//! renamed over the target, so readers never observe a partial value.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::ports::{DurableKeyValue, KeyValueError};

const VALUE_SUFFIX: &str = ".kv";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// [`DurableKeyValue`] persisted as files in one directory.
#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: Dir,
    root: Utf8PathBuf,
}

impl FileKeyValueStore {
    /// Open `root`, creating it and any missing parents.
    ///
    /// # Errors
    ///
    /// [`KeyValueError::Unavailable`] when the directory cannot be created or
    /// opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, KeyValueError> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(root, ambient_authority()))
            .map(|dir| Self {
                dir,
                root: root.to_path_buf(),
            })
            .map_err(|err| KeyValueError::unavailable(format!("{root}: {err}")))
    }

    /// Directory holding the values.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn file_name(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        format!("{}{VALUE_SUFFIX}", hex::encode(hasher.finalize()))
    }
}

impl DurableKeyValue for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        match self.dir.read_to_string(Self::file_name(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(KeyValueError::read(key, err.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        let file_name = Self::file_name(key);
        write_atomic(&self.dir, &file_name, value)
            .map_err(|err| KeyValueError::write(key, err.to_string()))?;
        debug!(root = %self.root, key, bytes = value.len(), "stored value");
        Ok(())
    }
}

fn write_atomic(dir: &Dir, file_name: &str, contents: &str) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{file_name}.tmp.{}.{suffix}.{counter}",
        std::process::id()
    );

    if let Err(err) = write_temp_file(dir, &tmp_name, contents) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    if let Err(err) = replace_target(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    // Best effort; a failed directory sync does not undo the rename.
    drop(dir.open(".").and_then(|parent| parent.sync_all()));
    Ok(())
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(windows)]
fn replace_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp() -> TempDir {
        TempDir::new().expect("temp dir")
    }

    fn root_of(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().join("store")).expect("utf-8 temp path")
    }

    #[rstest]
    fn missing_key_reads_as_none(temp: TempDir) {
        let store = FileKeyValueStore::open(root_of(&temp)).expect("open store");
        assert_eq!(store.get("saved-jobs:student-1").expect("get"), None);
    }

    #[rstest]
    fn values_survive_reopening(temp: TempDir) {
        let root = root_of(&temp);
        FileKeyValueStore::open(&root)
            .expect("open store")
            .set("saved-jobs:student-1", r#"["job-1"]"#)
            .expect("set");

        let reopened = FileKeyValueStore::open(&root).expect("reopen store");

        assert_eq!(
            reopened.get("saved-jobs:student-1").expect("get").as_deref(),
            Some(r#"["job-1"]"#)
        );
    }

    #[rstest]
    fn keys_map_to_digest_file_names(temp: TempDir) {
        let root = root_of(&temp);
        let store = FileKeyValueStore::open(&root).expect("open store");
        store.set("a/b", "value").expect("set");

        let names: Vec<String> = std::fs::read_dir(root.as_std_path())
            .expect("list dir")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, vec![
            "c14cddc033f64b9dea80ea675cf280a015e672516090a5626781153dc68fea11.kv".to_owned()
        ]);
    }

    #[rstest]
    fn long_keys_round_trip(temp: TempDir) {
        let store = FileKeyValueStore::open(root_of(&temp)).expect("open store");
        let key = format!("saved-jobs:{}", "s".repeat(400));

        store.set(&key, "[]").expect("set long key");

        assert_eq!(store.get(&key).expect("get long key").as_deref(), Some("[]"));
        assert_eq!(FileKeyValueStore::file_name(&key).len(), 67);
    }

    #[rstest]
    fn overwrite_replaces_value(temp: TempDir) {
        let store = FileKeyValueStore::open(root_of(&temp)).expect("open store");
        store.set("k", "first").expect("set");
        store.set("k", "second").expect("set");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("second"));
    }
}
