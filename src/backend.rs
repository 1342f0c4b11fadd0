//! Pluggable in-memory maps holding the document.
//!
//! Implement [`DocumentBackend`] to bring your own map.

use crate::value::Document;
use serde_json::Value;
use std::collections::HashMap;

/// Map that holds the in-memory copy of a [`JsonStore`](crate::JsonStore)
/// document.
///
/// Every method works with owned values so the store API stays uniform
/// regardless of how the backend stores things internally. Backends that keep
/// values behind a lock clone on read, which is worth knowing about for large
/// nested values.
pub trait DocumentBackend: Send + Sync {
    /// Insert a value, returning the previous one if any.
    fn insert(&self, key: String, value: Value) -> Option<Value>;

    /// Look up a value by key.
    fn get(&self, key: &str) -> Option<Value>;

    /// Remove a key, returning its value if it was present.
    fn remove(&self, key: &str) -> Option<Value>;

    /// Consistent snapshot of all entries. The returned iterator must not hold
    /// locks that would block writers.
    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (String, Value)> + Send + '_>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// `true` when there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a key exists without cloning the value. Override for backends
    /// that can do this cheaply (most can).
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Drop all entries. The default does iter + remove which is slow; override
    /// with the backend's native clear when available.
    fn clear(&self) {
        let keys: Vec<String> = self.iter_snapshot().map(|(k, _)| k).collect();
        for k in &keys {
            self.remove(k);
        }
    }

    /// Swap the whole content for `doc`.
    fn replace_all(&self, doc: Document) {
        self.clear();
        for (k, v) in doc {
            self.insert(k, v);
        }
    }
}

/// Materialize the backend content as a [`Document`].
pub fn snapshot<M: DocumentBackend + ?Sized>(map: &M) -> Document {
    map.iter_snapshot().collect()
}

// ---- RwLock<HashMap> ---------------------------------------------------------

impl DocumentBackend for parking_lot::RwLock<HashMap<String, Value>> {
    fn insert(&self, key: String, value: Value) -> Option<Value> {
        self.write().insert(key, value)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    fn remove(&self, key: &str) -> Option<Value> {
        self.write().remove(key)
    }

    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (String, Value)> + Send + '_> {
        let snap: Vec<_> = self
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Box::new(snap.into_iter())
    }

    fn len(&self) -> usize {
        self.read().len()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    fn clear(&self) {
        self.write().clear()
    }

    fn replace_all(&self, doc: Document) {
        let mut guard = self.write();
        guard.clear();
        guard.extend(doc);
    }
}

// ---- DashMap (feature-gated) -------------------------------------------------

#[cfg(feature = "dashmap")]
impl DocumentBackend for dashmap::DashMap<String, Value> {
    fn insert(&self, key: String, value: Value) -> Option<Value> {
        dashmap::DashMap::insert(self, key, value)
    }

    fn get(&self, key: &str) -> Option<Value> {
        dashmap::DashMap::get(self, key).map(|r| r.value().clone())
    }

    fn remove(&self, key: &str) -> Option<Value> {
        dashmap::DashMap::remove(self, key).map(|(_, v)| v)
    }

    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (String, Value)> + Send + '_> {
        let snap: Vec<_> = self
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        Box::new(snap.into_iter())
    }

    fn len(&self) -> usize {
        dashmap::DashMap::len(self)
    }

    fn contains_key(&self, key: &str) -> bool {
        dashmap::DashMap::contains_key(self, key)
    }

    fn clear(&self) {
        dashmap::DashMap::clear(self)
    }
}
