//! Orchestration error types

use thiserror::Error;

use crate::completion::CompletionError;
use crate::templates::TemplateError;
use crate::tools::ToolProviderError;
use crate::types::ContextError;

/// Errors surfaced by an orchestrator.
///
/// Cancellation from any lower layer arrives as `Cancelled`, never wrapped.
#[derive(Error, Debug)]
pub enum OrchestrationError {
    /// The request was cancelled
    #[error("Request cancelled")]
    Cancelled,

    /// The orchestration context is malformed
    #[error("Invalid orchestration context: {0}")]
    InvalidContext(#[from] ContextError),

    /// A prompt template could not be rendered
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// The tool registry failed as a whole
    #[error("Tool registry error: {0}")]
    Registry(ToolProviderError),

    /// The completion backend failed
    #[error("Completion error: {0}")]
    Completion(CompletionError),

    /// An orchestrator could not be constructed
    #[error("Orchestrator unavailable: {0}")]
    Unavailable(String),
}

impl OrchestrationError {
    /// Whether this error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OrchestrationError::Cancelled)
    }
}

impl From<CompletionError> for OrchestrationError {
    fn from(e: CompletionError) -> Self {
        match e {
            CompletionError::Cancelled => OrchestrationError::Cancelled,
            other => OrchestrationError::Completion(other),
        }
    }
}

impl From<ToolProviderError> for OrchestrationError {
    fn from(e: ToolProviderError) -> Self {
        match e {
            ToolProviderError::Cancelled => OrchestrationError::Cancelled,
            other => OrchestrationError::Registry(other),
        }
    }
}

pub type OrchestrationResult<T> = Result<T, OrchestrationError>;
