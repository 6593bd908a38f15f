//! Namespacing wrapper.

use crate::{KeyValueStore, StoreError};
use std::sync::Arc;

/// A [`KeyValueStore`] view that prefixes every key with
/// `namespace:`, so per-feature and per-row keys compose without
/// collisions.
#[derive(Debug, Clone)]
pub struct ScopedStore {
    inner: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl ScopedStore {
    /// Scope `inner` under `namespace`.
    #[must_use]
    pub fn new(inner: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: format!("{}:", namespace.into()),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl KeyValueStore for ScopedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(&self.full_key(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(&self.full_key(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(&self.full_key(key))
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let full_prefix = self.full_key(prefix);
        Ok(self
            .inner
            .keys(&full_prefix)?
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.prefix).map(str::to_string))
            .collect())
    }
}
