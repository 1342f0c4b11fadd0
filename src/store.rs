//! Core store type and builder.

use crate::backend::{snapshot, DocumentBackend};
use crate::error::{Error, Result};
use crate::persist::{
    atomic_write, copy_file, decode, load, read_bytes, remove_file, sibling_with_extension,
};
use crate::serializer::{JsonSerializer, Serializer};
use crate::value::{into_mapping, into_sequence, is_zero, retain_ne, Document, MathOp};
use crate::DefaultBackend;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File used by [`JsonStore::open_default`].
pub const DEFAULT_PATH: &str = "database.json";

/// Extension appended to the store path for the default backup file.
pub const DEFAULT_BACKUP_EXTENSION: &str = "bak";

/// File-persisted JSON document store.
///
/// Holds one document (string keys to JSON values) in memory and rewrites the
/// whole backing file after every mutation. Reads never touch the disk.
///
/// Mutations compute the next document, write it, and only then update the
/// in-memory copy, so a failed call changes neither.
///
/// Mutations from several threads are serialized by an internal write lock,
/// so each one sees the result of the previous one and the file always
/// mirrors memory. Reads go straight to the backend. Two processes sharing
/// the file are not coordinated: last writer wins.
pub struct JsonStore<M = DefaultBackend> {
    map: M,
    write_lock: Mutex<()>,
    path: PathBuf,
    backup_path: PathBuf,
    serializer: JsonSerializer,
}

impl JsonStore {
    /// Open (or create) a store at `path` with the default backend and
    /// pretty-printed JSON.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder(path).build()
    }

    /// Open (or create) `database.json` in the working directory.
    pub fn open_default() -> Result<Self> {
        Self::open(DEFAULT_PATH)
    }

    /// Start configuring a new store. Call [`.build()`](JsonStoreBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> JsonStoreBuilder {
        JsonStoreBuilder::new(path)
    }
}

impl<M: DocumentBackend> JsonStore<M> {
    // ---- reads ----

    /// Value stored under `key`, or `None` if the key is absent.
    ///
    /// Stored falsy values (`0`, `false`, `""`, `null`) come back as they are.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.map.get(key)
    }

    /// Alias for [`get`](Self::get).
    #[must_use]
    pub fn fetch(&self, key: &str) -> Option<Value> {
        self.get(key)
    }

    /// Deserialize the value under `key` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.map
            .get(key)
            .map(serde_json::from_value)
            .transpose()
            .map_err(Error::from)
    }

    /// `true` if `key` is an entry of the document.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Look up `sub_key` inside the object stored at `key`.
    ///
    /// Fails with [`Error::ObjectNotFound`] when `key` is missing or does not
    /// hold an object.
    pub fn fetch_object(&self, key: &str, sub_key: &str) -> Result<Option<Value>> {
        let mut obj = self.mapping_at(key)?;
        Ok(obj.remove(sub_key))
    }

    /// Element `index` of the array stored at `key`, `None` when out of
    /// bounds.
    ///
    /// Fails with [`Error::ArrayNotFound`] when `key` is missing or does not
    /// hold an array.
    pub fn fetch_array(&self, key: &str, index: usize) -> Result<Option<Value>> {
        let mut seq = self.sequence_at(key)?;
        Ok((index < seq.len()).then(|| seq.swap_remove(index)))
    }

    /// Copy of the full document.
    #[must_use]
    pub fn all(&self) -> Document {
        snapshot(&self.map)
    }

    /// Number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// `true` when the document has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// All top-level keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.all().into_iter().map(|(k, _)| k).collect()
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where [`create_backup`](Self::create_backup) writes to.
    #[must_use]
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    // ---- writes ----

    /// Store `value` under `key`, replacing whatever was there. Returns the
    /// previous value.
    ///
    /// Passing `None` is the absent value and fails with
    /// [`Error::InvalidValue`]; `Value::Null` is stored like any other value.
    ///
    /// ```rust,no_run
    /// use json_docstore::JsonStore;
    /// use serde_json::{json, Value};
    ///
    /// let db = JsonStore::open("db.json").unwrap();
    /// db.set("answer", json!(42)).unwrap();
    /// db.set("nothing", Value::Null).unwrap();
    /// assert!(db.set("missing", None::<Value>).is_err());
    /// ```
    pub fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<Option<Value>>,
    ) -> Result<Option<Value>> {
        let key = key.into();
        let value: Option<Value> = value.into();
        let Some(value) = value else {
            return Err(Error::InvalidValue(key));
        };
        debug!(key = %key, "set");
        let _guard = self.write_lock.lock();
        self.commit_entry(key, Some(value))
    }

    /// Serialize `value` and store it under `key`.
    pub fn set_serialized<T>(&self, key: impl Into<String>, value: &T) -> Result<Option<Value>>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value).map_err(|e| Error::Serialize(e.to_string()))?;
        self.set(key, value)
    }

    /// Remove `key`, returning its value if it was present. Absent keys are
    /// a no-op and leave the file untouched.
    pub fn remove(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self.write_lock.lock();
        if !self.map.contains_key(key) {
            return Ok(None);
        }
        debug!(key, "remove");
        self.commit_entry(key.to_string(), None)
    }

    /// Remove every element equal to `value` from the array at `key`.
    /// Returns how many elements were removed.
    pub fn delete(&self, key: &str, value: &Value) -> Result<usize> {
        let _guard = self.write_lock.lock();
        let mut seq = self.sequence_at(key)?;
        let removed = retain_ne(&mut seq, value);
        if removed > 0 {
            debug!(key, removed, "delete from array");
            self.commit_entry(key.to_string(), Some(Value::Array(seq)))?;
        }
        Ok(removed)
    }

    /// Remove `sub_key` from the object at `key`, returning its value if it
    /// was present.
    pub fn delete_key(&self, key: &str, sub_key: &str) -> Result<Option<Value>> {
        let _guard = self.write_lock.lock();
        let mut obj = self.mapping_at(key)?;
        let prev = obj.remove(sub_key);
        if prev.is_some() {
            debug!(key, sub_key, "delete from object");
            self.commit_entry(key.to_string(), Some(Value::Object(obj)))?;
        }
        Ok(prev)
    }

    /// Strip `value` from the whole document in one write: arrays lose every
    /// matching element, and entries whose value equals `value` are removed.
    /// Returns the number of elements plus entries removed.
    pub fn delete_each(&self, value: &Value) -> Result<usize> {
        let _guard = self.write_lock.lock();
        let mut doc = self.all();
        let mut removed = 0;
        doc.retain(|_, v| match v {
            Value::Array(seq) => {
                removed += retain_ne(seq, value);
                true
            }
            other if other == value => {
                removed += 1;
                false
            }
            _ => true,
        });
        if removed > 0 {
            debug!(removed, "delete each");
            self.commit_document(doc)?;
        }
        Ok(removed)
    }

    /// Apply `f` to the value at `key` and store the result.
    ///
    /// Fails with [`Error::KeyNotFound`] when the key is absent.
    pub fn update<F>(&self, key: &str, f: F) -> Result<Value>
    where
        F: FnOnce(&mut Value),
    {
        let _guard = self.write_lock.lock();
        let mut value = self
            .map
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))?;
        f(&mut value);
        self.commit_entry(key.to_string(), Some(value.clone()))?;
        Ok(value)
    }

    /// `key <operator> operand`, where `operator` is one of `+ - * /`.
    /// Stores and returns the result.
    ///
    /// ```rust,no_run
    /// use json_docstore::JsonStore;
    /// use serde_json::json;
    ///
    /// let db = JsonStore::open("db.json").unwrap();
    /// db.set("counter", json!(10)).unwrap();
    /// assert_eq!(db.math("counter", "+", 5).unwrap(), 15.into());
    /// ```
    pub fn math(&self, key: &str, operator: &str, operand: impl Into<Value>) -> Result<Number> {
        let _guard = self.write_lock.lock();
        let Some(Value::Number(current)) = self.map.get(key) else {
            return Err(Error::NotANumber(key.to_string()));
        };
        let op: MathOp = operator.parse()?;
        self.compute(key, current, op, operand.into())
    }

    /// Typed form of [`math`](Self::math).
    pub fn apply(&self, key: &str, op: MathOp, operand: impl Into<Value>) -> Result<Number> {
        let _guard = self.write_lock.lock();
        let Some(Value::Number(current)) = self.map.get(key) else {
            return Err(Error::NotANumber(key.to_string()));
        };
        self.compute(key, current, op, operand.into())
    }

    /// Replace the document with an empty one.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.commit_document(Document::new())?;
        info!(path = %self.path.display(), "cleared document");
        Ok(())
    }

    /// Delete the backing file. The in-memory document is kept, and the next
    /// mutation writes the file again. Returns `false` if there was no file.
    pub fn destroy(&self) -> Result<bool> {
        let _guard = self.write_lock.lock();
        let existed = remove_file(&self.path)?;
        info!(path = %self.path.display(), existed, "destroyed document file");
        Ok(existed)
    }

    /// Re-read the backing file, discarding the in-memory copy.
    ///
    /// Fails with [`Error::FileNotFound`] if the file is gone.
    pub fn reload(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        let doc = load(&self.path, &self.serializer)?
            .ok_or_else(|| Error::file_not_found(&self.path))?;
        debug!(path = %self.path.display(), entries = doc.len(), "reloaded document");
        self.map.replace_all(doc);
        Ok(())
    }

    // ---- backups ----

    /// Copy the backing file to [`backup_path`](Self::backup_path)
    /// (`<file>.bak` unless configured otherwise).
    pub fn create_backup(&self) -> Result<PathBuf> {
        self.create_backup_to(&self.backup_path)
    }

    /// Copy the backing file verbatim to `dest`.
    pub fn create_backup_to(&self, dest: impl AsRef<Path>) -> Result<PathBuf> {
        let dest = dest.as_ref();
        let _guard = self.write_lock.lock();
        copy_file(&self.path, dest)?;
        info!(path = %self.path.display(), backup = %dest.display(), "created backup");
        Ok(dest.to_path_buf())
    }

    /// Restore from [`backup_path`](Self::backup_path).
    pub fn restore_backup(&self) -> Result<()> {
        self.restore_backup_from(&self.backup_path)
    }

    /// Copy `src` over the backing file and load it.
    ///
    /// The backup is parsed before anything is written, so a missing
    /// ([`Error::FileNotFound`]) or malformed ([`Error::InvalidFormat`])
    /// backup leaves the store untouched.
    pub fn restore_backup_from(&self, src: impl AsRef<Path>) -> Result<()> {
        let src = src.as_ref();
        let _guard = self.write_lock.lock();
        let bytes = read_bytes(src)?.ok_or_else(|| Error::file_not_found(src))?;
        let doc = decode(&bytes, &self.serializer)?;
        atomic_write(&self.path, &bytes)?;
        info!(
            path = %self.path.display(),
            backup = %src.display(),
            entries = doc.len(),
            "restored backup"
        );
        self.map.replace_all(doc);
        Ok(())
    }

    // ---- internal ----

    fn sequence_at(&self, key: &str) -> Result<Vec<Value>> {
        self.map
            .get(key)
            .and_then(into_sequence)
            .ok_or_else(|| Error::ArrayNotFound(key.to_string()))
    }

    fn mapping_at(&self, key: &str) -> Result<Map<String, Value>> {
        self.map
            .get(key)
            .and_then(into_mapping)
            .ok_or_else(|| Error::ObjectNotFound(key.to_string()))
    }

    // Everything below expects the caller to hold `write_lock`.

    fn compute(&self, key: &str, current: Number, op: MathOp, operand: Value) -> Result<Number> {
        let Value::Number(operand) = operand else {
            return Err(Error::NotANumber(format!("{key} (operand)")));
        };
        if op == MathOp::Div && is_zero(&operand) {
            return Err(Error::DivisionByZero);
        }
        let result = op
            .apply(&current, &operand)
            .ok_or_else(|| Error::NumericOverflow(key.to_string()))?;
        debug!(key, op = %op, result = %result, "math");
        self.commit_entry(key.to_string(), Some(Value::Number(result.clone())))?;
        Ok(result)
    }

    /// Write the document with `key` set (or removed when `value` is `None`),
    /// then mirror the change in memory.
    fn commit_entry(&self, key: String, value: Option<Value>) -> Result<Option<Value>> {
        let mut doc = self.all();
        match &value {
            Some(v) => doc.insert(key.clone(), v.clone()),
            None => doc.remove(&key),
        };
        self.persist(&doc)?;
        Ok(match value {
            Some(v) => self.map.insert(key, v),
            None => self.map.remove(&key),
        })
    }

    fn commit_document(&self, doc: Document) -> Result<()> {
        self.persist(&doc)?;
        self.map.replace_all(doc);
        Ok(())
    }

    fn persist(&self, doc: &Document) -> Result<()> {
        let bytes = self.serializer.serialize(doc)?;
        atomic_write(&self.path, &bytes).map_err(|err| {
            warn!(path = %self.path.display(), error = %err, "failed to persist document");
            err
        })
    }
}

impl<M> std::fmt::Debug for JsonStore<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStore")
            .field("path", &self.path)
            .field("backup_path", &self.backup_path)
            .field("pretty", &self.serializer.is_pretty())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`JsonStore`].
///
/// ```rust,no_run
/// use json_docstore::JsonStore;
/// use parking_lot::RwLock;
/// use serde_json::Value;
/// use std::collections::HashMap;
///
/// let db = JsonStore::builder("db.json")
///     .pretty(false)
///     .backup_extension("snapshot")
///     .backend::<RwLock<HashMap<String, Value>>>()
///     .build()
///     .unwrap();
/// ```
pub struct JsonStoreBuilder<M = DefaultBackend> {
    path: PathBuf,
    pretty: bool,
    backup_extension: String,
    _marker: PhantomData<M>,
}

impl JsonStoreBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: true,
            backup_extension: DEFAULT_BACKUP_EXTENSION.to_string(),
            _marker: PhantomData,
        }
    }
}

impl<M: DocumentBackend + Default> JsonStoreBuilder<M> {
    /// Write human-readable JSON with two-space indentation (default: `true`).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Extension of the default backup file, appended to the store path
    /// (default: `"bak"`, giving `database.json.bak`).
    pub fn backup_extension(mut self, ext: impl Into<String>) -> Self {
        self.backup_extension = ext.into();
        self
    }

    /// Hold the in-memory document in a different map.
    pub fn backend<N: DocumentBackend + Default>(self) -> JsonStoreBuilder<N> {
        JsonStoreBuilder {
            path: self.path,
            pretty: self.pretty,
            backup_extension: self.backup_extension,
            _marker: PhantomData,
        }
    }

    /// Load the document, or create and persist an empty one if the file
    /// does not exist yet.
    pub fn build(self) -> Result<JsonStore<M>> {
        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };

        let store = JsonStore {
            map: M::default(),
            write_lock: Mutex::new(()),
            backup_path: sibling_with_extension(&self.path, &self.backup_extension),
            path: self.path,
            serializer,
        };

        match load(&store.path, &store.serializer)? {
            Some(doc) => {
                info!(path = %store.path.display(), entries = doc.len(), "opened document store");
                store.map.replace_all(doc);
            }
            None => {
                store.persist(&Document::new())?;
                info!(path = %store.path.display(), "created empty document store");
            }
        }

        Ok(store)
    }
}

impl<M> std::fmt::Debug for JsonStoreBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStoreBuilder")
            .field("path", &self.path)
            .field("pretty", &self.pretty)
            .field("backup_extension", &self.backup_extension)
            .finish()
    }
}
