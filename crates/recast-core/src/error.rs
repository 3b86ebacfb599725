//! Error types for the conversion engine
//!
//! Two terminal error kinds: a source value that cannot be reduced to the
//! wire form, and a wire value that cannot be mapped onto the destination
//! shape. Neither is retryable by the engine; a failed call leaves the
//! destination indeterminate and callers must discard it.

use serde_json::Value;
use thiserror::Error;

/// Main error type for conversion operations
#[derive(Error, Debug)]
pub enum Error {
    /// The source value could not be serialized into the wire form
    #[error("Encoding failed: {message}")]
    Encoding {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The wire form could not be mapped onto the destination shape
    #[error("Decoding failed at {path}: {message}")]
    Decoding {
        path: String,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Encoding failure with a plain message and no underlying cause.
    pub fn encoding(message: impl Into<String>) -> Self {
        Error::Encoding {
            message: message.into(),
            source: None,
        }
    }

    /// Encoding failure caused by the serializer itself.
    pub fn encoding_from(source: serde_json::Error) -> Self {
        Error::Encoding {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Decoding failure at `path` caused by a deserializer error.
    pub fn decoding(path: &str, source: serde_json::Error) -> Self {
        Error::Decoding {
            path: path.to_string(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Decoding failure at `path` where the wire value has the wrong kind
    /// for the destination field's declared type.
    pub fn type_mismatch(path: &str, expected: &str, found: &Value) -> Self {
        Error::Decoding {
            path: path.to_string(),
            message: format!("expected {expected}, found {}", value_kind(found)),
            source: None,
        }
    }
}

/// Human-readable kind name of a wire value, for error messages.
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
