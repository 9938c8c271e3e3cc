//! Completion collaborator traits

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::Stream;

use super::error::CompletionResult;
use crate::config::ConnectionSettings;
use crate::types::{CancellationToken, ChatMessage, CompletionContext, StreamChunk, ToolRegistryEntry};

/// Type alias for the streaming response of a completion backend
pub type StreamResponse = Pin<Box<dyn Stream<Item = CompletionResult<StreamChunk>> + Send>>;

/// Options for a single chat client request
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Tools available for the model to use
    pub tools: Option<Vec<ToolRegistryEntry>>,
}

impl ChatOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set temperature
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Set tools
    pub fn with_tools(mut self, tools: Vec<ToolRegistryEntry>) -> Self {
        self.tools = Some(tools);
        self
    }
}

/// The general completion transport, addressed by source (provider) name.
///
/// `complete_streaming` drives the main response; `complete` is the
/// non-streaming variant used for auxiliary calls.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Run a completion and return the full text
    async fn complete(
        &self,
        source_name: &str,
        messages: Vec<ChatMessage>,
        context: &CompletionContext,
        cancel: &CancellationToken,
    ) -> CompletionResult<String>;

    /// Stream a completion
    async fn complete_streaming(
        &self,
        source_name: &str,
        messages: Vec<ChatMessage>,
        context: CompletionContext,
        cancel: CancellationToken,
    ) -> CompletionResult<StreamResponse>;
}

/// A client bound to one model deployment
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Deployment (model) this client talks to
    fn deployment(&self) -> &str;

    /// Run a chat request and return the full text
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: ChatOptions,
        cancel: &CancellationToken,
    ) -> CompletionResult<String>;
}

/// Builds chat clients for a specific provider connection and deployment
pub trait ChatClientFactory: Send + Sync {
    /// Create a client for `deployment` on `connection`
    fn create_chat_client(
        &self,
        provider: &str,
        connection: &ConnectionSettings,
        deployment: &str,
    ) -> CompletionResult<Arc<dyn ChatClient>>;
}

/// Drain a response stream into its text, honoring cancellation.
///
/// Tool call chunks are ignored.
pub async fn collect_text(
    mut stream: StreamResponse,
    cancel: &CancellationToken,
) -> CompletionResult<String> {
    use futures::StreamExt;

    let mut text = String::new();
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(super::error::CompletionError::Cancelled),
            next = stream.next() => next,
        };

        match next {
            Some(chunk) => {
                if let Some(t) = chunk?.as_text() {
                    text.push_str(t);
                }
            }
            None => return Ok(text),
        }
    }
}
