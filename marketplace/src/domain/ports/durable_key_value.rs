//! Port for durable string storage keyed by name.
//!
//! This is the only persistence the client core owns. Calls are synchronous:
//! adapters back it with local files or an in-memory map, never the network.

use super::define_port_error;

define_port_error! {
    /// Errors raised by key-value storage adapters.
    pub enum KeyValueError {
        /// The storage backend could not be reached or opened.
        Unavailable { message: String } => "key-value storage unavailable: {message}",
        /// Reading the stored value failed.
        Read { key: String, message: String } => "failed to read {key}: {message}",
        /// Writing the value failed.
        Write { key: String, message: String } => "failed to write {key}: {message}",
    }
}

/// Durable get/set of string values.
#[cfg_attr(test, mockall::automock)]
pub trait DurableKeyValue: Send + Sync {
    /// Stored value for `key`, or `None` when nothing was stored.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError>;
}
