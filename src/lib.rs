//! Single-file JSON document store.
//!
//! One JSON object on disk, mirrored in memory. Every write rewrites the whole
//! file (atomic temp-file + rename), reads never touch the disk. On top of
//! plain get/set there are shape-checked helpers for arrays and objects,
//! in-place arithmetic, and verbatim file backups.
//!
//! ```rust,no_run
//! use json_docstore::JsonStore;
//! use serde_json::json;
//!
//! let db = JsonStore::open("db.json").unwrap();
//! db.set("hello", json!("world")).unwrap();
//! db.set("tags", json!(["a", "b", "a"])).unwrap();
//! db.delete("tags", &json!("a")).unwrap();
//! assert_eq!(db.get("tags"), Some(json!(["b"])));
//! ```
//!
//! **Single-process only.** If multiple processes open the same file they will
//! clobber each other. Use advisory file locking or a real database for
//! multi-process access.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod persist;
pub mod serializer;
pub mod store;
pub mod value;

pub use backend::DocumentBackend;
pub use error::{Error, Result};
pub use store::{JsonStore, JsonStoreBuilder, DEFAULT_BACKUP_EXTENSION, DEFAULT_PATH};
pub use value::{Document, MathOp};

/// Default backend: `RwLock<HashMap>`.
pub type DefaultBackend =
    parking_lot::RwLock<std::collections::HashMap<String, serde_json::Value>>;
