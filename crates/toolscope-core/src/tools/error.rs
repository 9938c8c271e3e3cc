//! Tool provider errors

use thiserror::Error;

use crate::mcp::McpError;

/// Errors a tool source can report while listing its tools
#[derive(Error, Debug)]
pub enum ToolProviderError {
    /// The request was cancelled; never swallowed by the registry
    #[error("Request cancelled")]
    Cancelled,

    /// The source could not be reached
    #[error("Tool source unavailable: {0}")]
    Unavailable(String),

    /// MCP server failure
    #[error("MCP error: {0}")]
    Mcp(#[from] McpError),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ToolProviderError {
    /// Whether this error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ToolProviderError::Cancelled)
    }
}

pub type ToolProviderResult<T> = Result<T, ToolProviderError>;
