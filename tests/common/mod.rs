#![allow(dead_code)]

use json_docstore::JsonStore;
use std::path::PathBuf;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("json_docstore=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

/// Fresh directory plus the path of a not-yet-existing store file inside it.
pub fn temp_store_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    (dir, path)
}

/// Store opened on a fresh file. Keep the `TempDir` alive for the test.
pub fn fresh_store() -> (TempDir, JsonStore) {
    let (dir, path) = temp_store_path();
    let db = JsonStore::open(&path).unwrap();
    (dir, db)
}
