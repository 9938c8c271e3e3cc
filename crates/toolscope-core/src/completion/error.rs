//! Completion backend error types

use thiserror::Error;

/// Errors that can occur while talking to a completion backend
#[derive(Error, Debug)]
pub enum CompletionError {
    /// Request was cancelled
    #[error("Request cancelled")]
    Cancelled,

    /// API request failed
    #[error("{provider} API error ({status}): {message}")]
    ApiError {
        provider: String,
        status: u16,
        message: String,
    },

    /// No usable deployment configured for the connection
    #[error("No deployment configured for {provider}/{connection}")]
    MissingDeployment { provider: String, connection: String },

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl CompletionError {
    /// Create an API error
    pub fn api_error(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a missing deployment error
    pub fn missing_deployment(provider: impl Into<String>, connection: impl Into<String>) -> Self {
        Self::MissingDeployment {
            provider: provider.into(),
            connection: connection.into(),
        }
    }

    /// Whether this error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CompletionError::Cancelled)
    }
}

pub type CompletionResult<T> = Result<T, CompletionError>;
