//! Error types for the user-store library
//!
//! This module provides a unified error handling system using `thiserror` for
//! all components of the library.

use thiserror::Error;

/// The main error type for the user-store library
#[derive(Error, Debug)]
pub enum Error {
    /// Engine operation errors
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Invalid input data
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Human-readable description of the invalid input
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable description of the configuration problem
        message: String,
    },

    /// Other errors
    #[error("Other error: {message}")]
    Other {
        /// Human-readable description of the error
        message: String,
    },
}

/// Engine-specific error types
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine backend not available
    #[error("Engine backend not available: {backend}")]
    BackendNotAvailable {
        /// Name of the backend that is not available
        backend: String,
    },

    /// Engine operation failed
    #[error("Engine operation failed: {operation}: {reason}")]
    OperationFailed {
        /// Name of the operation that failed
        operation: String,
        /// Reason the operation failed
        reason: String,
    },

    /// User record not found
    #[error("User not found: {username}")]
    UserNotFound {
        /// Username that could not be found
        username: String,
    },

    /// Invalid username
    #[error("Invalid username: {reason}")]
    InvalidUsername {
        /// Reason the username is invalid
        reason: String,
    },

    /// Connection error
    #[error("Connection error: {reason}")]
    ConnectionError {
        /// Reason the connection failed
        reason: String,
    },
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience type alias for Engine Results
pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let engine_error = EngineError::UserNotFound {
            username: "alice".to_string(),
        };
        let error = Error::Engine(engine_error);
        assert!(error.to_string().contains("Engine error"));
        assert!(error.to_string().contains("User not found"));
    }

    #[test]
    fn test_operation_failed_display() {
        let error = EngineError::OperationFailed {
            operation: "put_item".to_string(),
            reason: "throttled".to_string(),
        };
        assert!(error.to_string().contains("put_item"));
        assert!(error.to_string().contains("throttled"));
    }
}
