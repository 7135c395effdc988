//! Process-local key-value store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::ports::{DurableKeyValue, KeyValueError};

/// [`DurableKeyValue`] held in memory; contents vanish with the process.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, KeyValueError> {
        self.values
            .lock()
            .map_err(|_| KeyValueError::unavailable("in-memory store lock poisoned"))
    }
}

impl DurableKeyValue for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        Ok(self.values()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        self.values()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_previous_value() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("k").expect("get"), None);

        store.set("k", "one").expect("set");
        store.set("k", "two").expect("set");

        assert_eq!(store.get("k").expect("get").as_deref(), Some("two"));
    }
}
