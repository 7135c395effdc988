//! Key-value storage adapters for saved selections.

mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
