//! Error types for backend operations.

use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised by a storage backend.
///
/// The retry layer treats [`BackendError::Timeout`] as the
/// timeout-class: those grow the backoff delay between attempts. Every
/// other variant is retried with a flat delay.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend did not answer within its deadline.
    #[error("backend timeout: {message}")]
    Timeout {
        /// Description of the timed-out operation.
        message: String,
    },

    /// The backend could not be reached.
    #[error("backend connection error: {message}")]
    Connection {
        /// Description of the failure.
        message: String,
    },

    /// The backend answered with something the client cannot interpret.
    #[error("backend protocol error: {message}")]
    Protocol {
        /// Description of the failure.
        message: String,
    },
}

impl BackendError {
    /// Creates a timeout-class error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Returns true for timeout-class errors.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
