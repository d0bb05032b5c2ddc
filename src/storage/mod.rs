//! Key-value persistence substrates.
//!
//! The shelf persists two independent slots of JSON text. Anything that can
//! synchronously get and set a string by key can back it: an in-memory map
//! for tests and headless use, or a directory of files on disk.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Slot holding the serialized snippet collection.
pub const SNIPPETS_KEY: &str = "code-snippets";

/// Slot holding the serialized category collection.
pub const CATEGORIES_KEY: &str = "snippet-categories";

/// Key under which the unreadable text of `slot` is kept before the slot is
/// overwritten.
pub fn backup_key(slot: &str) -> String {
    format!("{slot}-corrupt")
}

/// Errors raised by a persistence substrate.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the value would exceed the substrate's capacity.
    #[error("Storage quota exceeded writing '{key}': {needed} bytes needed, {limit} allowed")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// The key cannot be mapped onto the substrate.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),

    /// The substrate could not be read or written.
    #[error("Storage I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// A synchronous string-to-string store.
pub trait KeyValueStore {
    /// Returns `Ok(None)` when nothing has been stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value under `key` as a whole.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}
