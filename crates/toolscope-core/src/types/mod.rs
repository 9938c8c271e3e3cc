//! Core types for tool orchestration
//!
//! This module contains the shared types used by the registry, the
//! orchestrator and the completion collaborators.

mod message;
mod tool;
mod stream;
mod cancellation;
mod context;

pub use message::{ChatMessage, ContentPart, MessageRole, MessageContent};
pub use tool::{ToolCall, ToolRegistryEntry, ToolSource};
pub use stream::StreamChunk;
pub use cancellation::CancellationToken;
pub use context::{CompletionContext, ContextError, OrchestrationContext};
