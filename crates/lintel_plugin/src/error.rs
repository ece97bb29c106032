//! Plugin error types.

use thiserror::Error;

/// Errors raised by check plugins and their registration.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Two factories claimed the same check name.
    #[error("Duplicate check name: {0}")]
    DuplicateCheck(String),

    /// A check name is not registered.
    #[error("Check not found: {0}")]
    NotFound(String),

    /// A check's options could not be understood.
    #[error("Invalid options for check '{check}': {message}")]
    InvalidOptions {
        /// Name of the check.
        check: String,
        /// What was wrong.
        message: String,
    },

    /// A check callback failed while handling a match.
    #[error("{0}")]
    CheckFailed(String),

    /// A check could not be set up.
    #[error("Internal plugin error: {0}")]
    Internal(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PluginError {
    /// Creates a duplicate check error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateCheck(name.into())
    }

    /// Creates a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Creates an invalid options error.
    pub fn invalid_options(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            check: check.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a check failure.
    pub fn check_failed(message: impl Into<String>) -> Self {
        Self::CheckFailed(message.into())
    }
}
