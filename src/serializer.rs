//! Serialization layer. JSON via serde_json.
//!
//! Implement [`Serializer`] if you need a different on-disk format.

use crate::error::{Error, Result};
use crate::value::Document;
use serde_json::Value;

/// Converts a document to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode a document to bytes.
    fn serialize(&self, doc: &Document) -> Result<Vec<u8>>;

    /// Decode bytes back into a document. Anything that is not a top-level
    /// object is rejected with [`Error::InvalidFormat`].
    fn deserialize(&self, bytes: &[u8]) -> Result<Document>;
}

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// `true` when writing indented output.
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, doc: &Document) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(doc)
        } else {
            serde_json::to_vec(doc)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Document> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| Error::InvalidFormat(e.to_string()))?;
        match value {
            Value::Object(doc) => Ok(doc),
            other => Err(Error::InvalidFormat(format!(
                "top-level value must be an object, found {}",
                kind(&other)
            ))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        match json!({"name": "store", "tags": ["a", "b"], "n": 3}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn pretty_output_is_indented_with_two_spaces() {
        let bytes = JsonSerializer::pretty().serialize(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\n  \"name\""));
    }

    #[test]
    fn compact_output_is_one_line() {
        let bytes = JsonSerializer::new().serialize(&sample()).unwrap();
        assert!(!bytes.contains(&b'\n'));
    }

    #[test]
    fn rejects_non_object_top_level() {
        let err = JsonSerializer::new().deserialize(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(ref m) if m.contains("an array")));
    }

    #[test]
    fn rejects_garbage() {
        let err = JsonSerializer::new().deserialize(b"{\"a\": ").unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn decodes_what_it_encodes() {
        let ser = JsonSerializer::pretty();
        let doc = sample();
        let back = ser.deserialize(&ser.serialize(&doc).unwrap()).unwrap();
        assert_eq!(back, doc);
    }
}
