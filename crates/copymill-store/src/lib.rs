//! Key-value persistence for content tooling
//!
//! An explicit, injected storage interface in place of ambient browser
//! storage:
//! - [`KeyValueStore`] — the object-safe trait consumed everywhere,
//! - [`MemoryStore`] — concurrent in-memory map for tests and sessions,
//! - [`JsonFileStore`] — a single JSON file, rewritten wholesale on each
//!   mutation (last write wins, no schema versioning),
//! - [`ScopedStore`] — namespacing wrapper (`namespace:key`),
//! - [`StoreExt`] — typed JSON helpers over any store.

mod error;
mod file;
mod memory;
mod scoped;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use scoped::ScopedStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Object-safe key-value storage.
///
/// Values are opaque strings (JSON-serialized by convention). There are
/// no transactions and no versioning: concurrent writers to the same key
/// are last-write-wins.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys starting with `prefix`, in unspecified order.
    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Typed helpers available on every [`KeyValueStore`].
pub trait StoreExt {
    /// Fetch and deserialize the JSON value under `key`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>;

    /// Serialize `value` to JSON and store it under `key`.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}
