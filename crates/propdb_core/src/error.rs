//! Error types for PropDB core.

use propdb_backend::BackendError;
use propdb_document::DocumentError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in PropDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Document manipulation error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Backend error that escaped without going through the retry loop.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// The retry budget ran out; wraps the last underlying cause.
    ///
    /// Fatal: callers must treat this as non-recoverable at this layer.
    #[error("no more retries after {attempts} attempts: {cause}")]
    RetriesExhausted {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// The failure observed on the final attempt.
        #[source]
        cause: BackendError,
    },

    /// A property's string form did not match its expected shape.
    #[error("cannot parse value for property '{property}': {message}")]
    Parse {
        /// Name of the property being set.
        property: String,
        /// Description of the shape mismatch.
        message: String,
    },

    /// A declared entity or value type could not be built from stored
    /// data. This is a programming-contract violation, never retried.
    #[error("cannot construct {type_name}: {message}")]
    Construction {
        /// Name of the type that failed to build.
        type_name: String,
        /// Description of the failure.
        message: String,
    },
}

impl CoreError {
    /// Creates a retries exhausted error.
    pub fn retries_exhausted(attempts: u32, cause: BackendError) -> Self {
        Self::RetriesExhausted { attempts, cause }
    }

    /// Creates a parse error for a property.
    pub fn parse(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Creates a construction error.
    pub fn construction(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}
