//! Unified error type for all store operations.

use std::path::Path;

/// Things that can go wrong when using the store.
///
/// Every variant is raised before the document is touched, so a failed call
/// leaves both the file and the in-memory copy as they were.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A file that had to exist (backup source, primary file) is missing.
    #[error("file not found: {0}")]
    FileNotFound(String),
    /// The backing file is not a JSON object.
    #[error("invalid document format: {0}")]
    InvalidFormat(String),
    /// Tried to store an absent value under `key`.
    #[error("invalid value for key `{0}`: value is absent")]
    InvalidValue(String),
    /// The key is not in the document.
    #[error("key not found: `{0}`")]
    KeyNotFound(String),
    /// The value at the key is not a non-null object.
    #[error("value at `{0}` is not an object")]
    ObjectNotFound(String),
    /// The value at the key is not an array.
    #[error("value at `{0}` is not an array")]
    ArrayNotFound(String),
    /// The value at the key (or the operand) is not a number.
    #[error("value at `{0}` is not a number")]
    NotANumber(String),
    /// `math` was given something other than `+`, `-`, `*` or `/`.
    #[error("invalid operator: `{0}`")]
    InvalidOperator(String),
    /// `math` was asked to divide by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// The arithmetic result is not representable as a JSON number.
    #[error("numeric overflow at `{0}`")]
    NumericOverflow(String),
    /// File system problem (read, write, rename, copy).
    #[error("i/o error: {0}")]
    Io(String),
    /// Failed to serialize a value or the document.
    #[error("serialization error: {0}")]
    Serialize(String),
}

impl Error {
    pub(crate) fn file_not_found(path: &Path) -> Self {
        Error::FileNotFound(path.display().to_string())
    }

    /// `true` for the shape-check failures (`ObjectNotFound`, `ArrayNotFound`).
    #[must_use]
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Error::ObjectNotFound(_) | Error::ArrayNotFound(_))
    }

    /// `true` for failures raised by [`math`](crate::JsonStore::math).
    #[must_use]
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Error::NotANumber(_)
                | Error::InvalidOperator(_)
                | Error::DivisionByZero
                | Error::NumericOverflow(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() {
            Error::InvalidFormat(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
