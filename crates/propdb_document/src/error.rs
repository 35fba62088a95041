//! Error types for the document crate.

use thiserror::Error;

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur while manipulating or serializing documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A field holds a value of a different kind than requested.
    #[error("field '{field}' holds a {actual} value, expected {expected}")]
    TypeMismatch {
        /// Name of the offending field.
        field: String,
        /// Kind the caller asked for.
        expected: &'static str,
        /// Kind actually stored.
        actual: &'static str,
    },

    /// The text form could not be produced or parsed.
    #[error("document text error: {0}")]
    Text(#[from] serde_json::Error),

    /// A value kind is not representable in the requested context.
    #[error("unsupported value kind {kind} for field '{field}'")]
    UnsupportedValue {
        /// Name of the offending field.
        field: String,
        /// Kind of the unsupported value.
        kind: &'static str,
    },
}

impl DocumentError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Creates an unsupported value error.
    pub fn unsupported_value(field: impl Into<String>, kind: &'static str) -> Self {
        Self::UnsupportedValue {
            field: field.into(),
            kind,
        }
    }
}
