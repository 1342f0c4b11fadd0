mod common;

use common::temp_store_path;
use json_docstore::backend::snapshot;
use json_docstore::{DefaultBackend, DocumentBackend, JsonStore};
use parking_lot::{Mutex, RwLock};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};

fn exercise<M: DocumentBackend>(map: &M) {
    assert!(map.is_empty());
    assert!(map.insert("a".into(), json!(1)).is_none());
    assert_eq!(map.insert("a".into(), json!(2)), Some(json!(1)));
    map.insert("b".into(), json!([true]));
    assert_eq!(map.len(), 2);
    assert!(map.contains_key("b"));
    assert_eq!(map.get("b"), Some(json!([true])));
    assert_eq!(map.remove("a"), Some(json!(2)));
    assert!(!map.contains_key("a"));

    let mut doc = json_docstore::Document::new();
    doc.insert("x".into(), json!("y"));
    map.replace_all(doc.clone());
    assert_eq!(snapshot(map), doc);

    map.clear();
    assert!(map.is_empty());
}

/// Minimal user-supplied backend: only the required methods.
#[derive(Default)]
struct OrderedBackend(Mutex<BTreeMap<String, Value>>);

impl DocumentBackend for OrderedBackend {
    fn insert(&self, key: String, value: Value) -> Option<Value> {
        self.0.lock().insert(key, value)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.0.lock().get(key).cloned()
    }

    fn remove(&self, key: &str) -> Option<Value> {
        self.0.lock().remove(key)
    }

    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (String, Value)> + Send + '_> {
        let snap: Vec<_> = self.0.lock().clone().into_iter().collect();
        Box::new(snap.into_iter())
    }

    fn len(&self) -> usize {
        self.0.lock().len()
    }
}

#[test]
fn rwlock_hashmap_backend_contract() {
    exercise(&RwLock::new(HashMap::<String, Value>::new()));
}

#[test]
fn default_backend_is_rwlock_hashmap() {
    let map: DefaultBackend = RwLock::new(HashMap::new());
    exercise(&map);
}

#[test]
fn custom_backend_uses_trait_defaults() {
    exercise(&OrderedBackend::default());
}

#[test]
fn custom_backend_store_roundtrip() {
    let (_dir, path) = temp_store_path();
    {
        let db = JsonStore::builder(&path)
            .backend::<OrderedBackend>()
            .build()
            .unwrap();
        db.set("k", json!({"n": 100})).unwrap();
        assert!(db.has("k"));
        assert_eq!(db.fetch_object("k", "n").unwrap(), Some(json!(100)));
        db.delete_each(&json!({"n": 100})).unwrap();
        assert!(db.is_empty());
        db.set("k", json!([1, 2])).unwrap();
    }
    let db = JsonStore::open(&path).unwrap();
    assert_eq!(db.get("k"), Some(json!([1, 2])));
}

#[cfg(feature = "dashmap")]
mod dashmap_tests {
    use super::{exercise, temp_store_path};
    use dashmap::DashMap;
    use json_docstore::JsonStore;
    use serde_json::{json, Value};

    #[test]
    fn dashmap_backend_contract() {
        exercise(&DashMap::<String, Value>::new());
    }

    #[test]
    fn dashmap_persist_and_reload() {
        let (_dir, path) = temp_store_path();
        {
            let db = JsonStore::builder(&path)
                .backend::<DashMap<String, Value>>()
                .build()
                .unwrap();
            db.set("key", json!("val")).unwrap();
        }
        let db = JsonStore::builder(&path)
            .backend::<DashMap<String, Value>>()
            .build()
            .unwrap();
        assert_eq!(db.get("key"), Some(json!("val")));
    }
}
