//! Disk I/O helpers: load, atomic write, and the file copies used by backups.
//!
//! The rename-over approach is close to atomic on most platforms. On NTFS
//! (Windows) it's reliable; on FAT32 or network shares there are no hard
//! guarantees. If that matters to you, keep backups or use a real database.

use crate::error::{Error, Result};
use crate::serializer::Serializer;
use crate::value::Document;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw contents of `path`, or `None` if the file is missing.
pub fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(b) => Ok(Some(b)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e.to_string())),
    }
}

/// Decode file contents; an empty file is an empty document.
pub fn decode<S: Serializer>(bytes: &[u8], serializer: &S) -> Result<Document> {
    if bytes.is_empty() {
        return Ok(Document::new());
    }
    serializer.deserialize(bytes)
}

/// Reads and deserializes the file at `path`. Returns `None` if the file is
/// missing; an empty file counts as an empty document.
pub fn load<S: Serializer>(path: &Path, serializer: &S) -> Result<Option<Document>> {
    let Some(bytes) = read_bytes(path)? else {
        return Ok(None);
    };
    debug!(path = %path.display(), bytes = bytes.len(), "loaded document file");
    decode(&bytes, serializer).map(Some)
}

/// Write `bytes` to a hidden temp file next to `path` and then rename over
/// `path`. This avoids leaving a half-written file if the process crashes
/// mid-write.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path_for(path);
    std::fs::write(&tmp, bytes).map_err(|e| Error::Io(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| Error::Io(e.to_string()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote document file");
    Ok(())
}

/// Copy `from` to `to` byte for byte, going through [`atomic_write`] so the
/// source is never truncated, even when both name the same file. A missing
/// source is [`Error::FileNotFound`].
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    let bytes = read_bytes(from)?.ok_or_else(|| Error::file_not_found(from))?;
    atomic_write(to, &bytes)?;
    debug!(from = %from.display(), to = %to.display(), bytes = bytes.len(), "copied file");
    Ok(bytes.len() as u64)
}

/// Remove `path`. Returns `false` if it was already gone.
pub fn remove_file(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Io(e.to_string())),
    }
}

/// `<path>.<ext>`, keeping the existing extension: `db.json` -> `db.json.bak`.
pub fn sibling_with_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Write-ahead temp file for `path`: `dir/db.json` -> `dir/.db.json.tmp`.
///
/// The leading dot keeps it distinct from every `<path>.<ext>` sibling, so a
/// backup can never be picked up by a rename.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or(path.as_os_str()));
    name.push(".tmp");
    path.with_file_name(name)
}
