//! Mock completion backends for testing
//!
//! Provides deterministic, configurable responses without network dependencies.
//! Both mocks record the requests they receive so tests can assert on the
//! messages and completion context the orchestrator produced.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use parking_lot::Mutex;

use super::error::{CompletionError, CompletionResult};
use super::traits::{collect_text, ChatClient, ChatOptions, CompletionService, StreamResponse};
use crate::logging::Logger;
use crate::types::{CancellationToken, ChatMessage, CompletionContext, MessageRole, StreamChunk};

/// Mock response mode
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the last user message
    #[default]
    Echo,
    /// Return a fixed response
    Fixed(String),
    /// Return response as specific chunks
    Chunks(Vec<String>),
    /// Yield `delay_chunks` chunks, then fail
    Error { message: String, delay_chunks: usize },
    /// Return nothing (empty response)
    Empty,
}

/// Configuration shared by the mock backends
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Response mode
    pub mode: MockMode,
    /// Delay before each chunk in milliseconds (0 = no delay)
    pub chunk_delay_ms: u64,
    /// Size of each chunk when splitting fixed/echo responses
    pub chunk_size: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            mode: MockMode::Echo,
            chunk_delay_ms: 0,
            chunk_size: 10,
        }
    }
}

impl MockConfig {
    /// Create a config for `mode`
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    fn chunks_for(&self, messages: &[ChatMessage]) -> Vec<CompletionResult<String>> {
        match &self.mode {
            MockMode::Echo => split_into_chunks(
                &format!("Echo: {}", last_user_message(messages)),
                self.chunk_size,
            )
            .into_iter()
            .map(Ok)
            .collect(),
            MockMode::Fixed(response) => split_into_chunks(response, self.chunk_size)
                .into_iter()
                .map(Ok)
                .collect(),
            MockMode::Chunks(chunks) => chunks.iter().cloned().map(Ok).collect(),
            MockMode::Empty => Vec::new(),
            MockMode::Error {
                message,
                delay_chunks,
            } => {
                let mut result: Vec<CompletionResult<String>> = (0..*delay_chunks)
                    .map(|i| Ok(format!("Chunk {} before error. ", i)))
                    .collect();
                result.push(Err(CompletionError::Other(format!("Mock error: {}", message))));
                result
            }
        }
    }

    fn stream(&self, messages: &[ChatMessage], cancel: CancellationToken) -> StreamResponse {
        let delay_ms = self.chunk_delay_ms;

        let stream = stream::iter(self.chunks_for(messages)).then(move |chunk| {
            let cancel = cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return Err(CompletionError::Cancelled);
                }

                if delay_ms > 0 {
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(CompletionError::Cancelled),
                        _ = tokio::time::sleep(Duration::from_millis(delay_ms)) => {}
                    }
                }

                chunk.map(StreamChunk::text)
            }
        });

        Box::pin(stream)
    }
}

/// Extract last user message text
fn last_user_message(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .rev()
        .filter(|m| m.role == MessageRole::User)
        .find_map(|m| m.text().filter(|t| !t.is_empty()))
        .unwrap_or_else(|| "Hello from the mock backend!".to_string())
}

/// Split text into chunks of `size` characters
fn split_into_chunks(text: &str, size: usize) -> Vec<String> {
    if size == 0 || text.is_empty() {
        return vec![text.to_string()];
    }

    text.chars()
        .collect::<Vec<_>>()
        .chunks(size)
        .map(|c| c.iter().collect())
        .collect()
}

/// A request seen by a mock backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub source_name: String,
    pub messages: Vec<ChatMessage>,
    pub context: CompletionContext,
}

/// Mock completion service
pub struct MockCompletionService {
    config: MockConfig,
    /// Response of the non-streaming `complete`; the streaming config when unset
    complete_config: Option<MockConfig>,
    complete_calls: AtomicUsize,
    streaming_calls: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
    logger: Arc<dyn Logger>,
}

impl MockCompletionService {
    /// Create a service with the given config
    pub fn with_config(config: MockConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            config,
            complete_config: None,
            complete_calls: AtomicUsize::new(0),
            streaming_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            logger,
        }
    }

    /// Create an echo service (echoes back user message)
    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::with_config(MockConfig::new(MockMode::Echo), logger)
    }

    /// Create a fixed response service
    pub fn fixed(response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_config(MockConfig::new(MockMode::Fixed(response.into())), logger)
    }

    /// Create a chunked response service
    pub fn chunked(chunks: Vec<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_config(MockConfig::new(MockMode::Chunks(chunks)), logger)
    }

    /// Create a service whose stream fails after `delay_chunks` chunks
    pub fn error(message: impl Into<String>, delay_chunks: usize, logger: Arc<dyn Logger>) -> Self {
        Self::with_config(
            MockConfig::new(MockMode::Error {
                message: message.into(),
                delay_chunks,
            }),
            logger,
        )
    }

    /// Use a separate response for non-streaming calls
    pub fn with_complete_config(mut self, config: MockConfig) -> Self {
        self.complete_config = Some(config);
        self
    }

    /// Set chunk delay
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.config.chunk_delay_ms = delay_ms;
        self
    }

    /// Number of non-streaming calls so far
    pub fn complete_calls(&self) -> usize {
        self.complete_calls.load(Ordering::SeqCst)
    }

    /// Number of streaming calls so far
    pub fn streaming_calls(&self) -> usize {
        self.streaming_calls.load(Ordering::SeqCst)
    }

    /// Every request received, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    fn record(&self, source_name: &str, messages: &[ChatMessage], context: &CompletionContext) {
        self.requests.lock().push(RecordedRequest {
            source_name: source_name.to_string(),
            messages: messages.to_vec(),
            context: context.clone(),
        });
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    async fn complete(
        &self,
        source_name: &str,
        messages: Vec<ChatMessage>,
        context: &CompletionContext,
        cancel: &CancellationToken,
    ) -> CompletionResult<String> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        self.record(source_name, &messages, context);
        self.logger.debug("[MockCompletionService] complete called");

        let config = self.complete_config.as_ref().unwrap_or(&self.config);
        collect_text(config.stream(&messages, cancel.clone()), cancel).await
    }

    async fn complete_streaming(
        &self,
        source_name: &str,
        messages: Vec<ChatMessage>,
        context: CompletionContext,
        cancel: CancellationToken,
    ) -> CompletionResult<StreamResponse> {
        self.streaming_calls.fetch_add(1, Ordering::SeqCst);
        self.record(source_name, &messages, &context);
        self.logger.debug(&format!(
            "[MockCompletionService] complete_streaming called with {} tools",
            context.tool_names.len()
        ));

        if cancel.is_cancelled() {
            return Err(CompletionError::Cancelled);
        }

        Ok(self.config.stream(&messages, cancel))
    }
}

/// Mock chat client bound to one deployment
pub struct MockChatClient {
    deployment: String,
    config: MockConfig,
    calls: AtomicUsize,
    last_options: Mutex<Option<ChatOptions>>,
}

impl MockChatClient {
    /// Create a client for `deployment`
    pub fn new(deployment: impl Into<String>, config: MockConfig) -> Self {
        Self {
            deployment: deployment.into(),
            config,
            calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    /// Create a fixed response client
    pub fn fixed(deployment: impl Into<String>, response: impl Into<String>) -> Self {
        Self::new(deployment, MockConfig::new(MockMode::Fixed(response.into())))
    }

    /// Number of calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Options of the most recent call
    pub fn last_options(&self) -> Option<ChatOptions> {
        self.last_options.lock().clone()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    fn deployment(&self) -> &str {
        &self.deployment
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: ChatOptions,
        cancel: &CancellationToken,
    ) -> CompletionResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock() = Some(options);
        collect_text(self.config.stream(&messages, cancel.clone()), cancel).await
    }
}
