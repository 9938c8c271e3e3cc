//! Completion backend over the genai crate
//!
//! Handles every genai-supported provider (OpenAI, Anthropic, Gemini, Ollama, ...)
//! plus OpenAI-compatible endpoints configured through `api_base`.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use genai::chat::{ChatRequest, ChatStreamEvent};

use super::error::{CompletionError, CompletionResult};
use super::genai_adapter::{create_client, from_genai_event, to_genai_messages, to_genai_options, to_genai_tool};
use super::traits::{collect_text, ChatClient, ChatClientFactory, ChatOptions, CompletionService, StreamResponse};
use crate::config::{find_connection, ConnectionSettings};
use crate::logging::Logger;
use crate::types::{CancellationToken, ChatMessage, CompletionContext, ToolRegistryEntry};

/// Chat client bound to one deployment of one connection
pub struct GenaiChatClient {
    provider: String,
    deployment: String,
    client: genai::Client,
    logger: Arc<dyn Logger>,
}

impl GenaiChatClient {
    /// Create a client for `deployment` on `connection`
    pub fn new(connection: &ConnectionSettings, deployment: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            provider: connection.provider.clone(),
            deployment: deployment.into(),
            client: create_client(connection),
            logger,
        }
    }

    /// Stream a chat request
    pub async fn stream(
        &self,
        messages: Vec<ChatMessage>,
        options: ChatOptions,
        cancel: CancellationToken,
    ) -> CompletionResult<StreamResponse> {
        self.logger.info(&format!(
            "[GenaiChatClient] Starting stream: provider={}, deployment={}",
            self.provider, self.deployment
        ));

        let mut chat_req = ChatRequest::new(to_genai_messages(messages));
        if let Some(tools) = options.tools.as_ref().filter(|t| !t.is_empty()) {
            chat_req = chat_req.with_tools(tools.iter().map(to_genai_tool).collect::<Vec<_>>());
        }
        let genai_options = to_genai_options(&options);

        let chat_stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CompletionError::Cancelled),
            started = self.client.exec_chat_stream(self.deployment.as_str(), chat_req, Some(&genai_options)) => {
                started.map_err(|e| CompletionError::api_error(&self.provider, 500, e.to_string()))?
            }
        };

        let logger = Arc::clone(&self.logger);
        let provider = self.provider.clone();

        let stream = chat_stream.stream.filter_map(move |result| {
            let cancel = cancel.clone();
            let logger = Arc::clone(&logger);
            let provider = provider.clone();

            async move {
                if cancel.is_cancelled() {
                    logger.info("[GenaiChatClient] Stream cancelled");
                    return Some(Err(CompletionError::Cancelled));
                }

                match result {
                    Ok(event) => {
                        if matches!(event, ChatStreamEvent::End(_)) {
                            logger.debug("[GenaiChatClient] Stream event: End");
                        }
                        from_genai_event(event)
                    }
                    Err(e) => {
                        logger.error(&format!("[GenaiChatClient] Stream error: {}", e));
                        Some(Err(CompletionError::api_error(provider, 500, e.to_string())))
                    }
                }
            }
        });

        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl ChatClient for GenaiChatClient {
    fn deployment(&self) -> &str {
        &self.deployment
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: ChatOptions,
        cancel: &CancellationToken,
    ) -> CompletionResult<String> {
        let stream = self.stream(messages, options, cancel.clone()).await?;
        collect_text(stream, cancel).await
    }
}

/// Builds `GenaiChatClient`s
pub struct GenaiChatClientFactory {
    logger: Arc<dyn Logger>,
}

impl GenaiChatClientFactory {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl ChatClientFactory for GenaiChatClientFactory {
    fn create_chat_client(
        &self,
        provider: &str,
        connection: &ConnectionSettings,
        deployment: &str,
    ) -> CompletionResult<Arc<dyn ChatClient>> {
        if deployment.trim().is_empty() {
            return Err(CompletionError::missing_deployment(provider, &connection.name));
        }
        Ok(Arc::new(GenaiChatClient::new(connection, deployment, Arc::clone(&self.logger))))
    }
}

/// Completion service over configured genai connections.
///
/// The source name selects the provider; `CompletionContext` picks the
/// connection, deployment, system message and the tools offered.
pub struct GenaiCompletionService {
    connections: Vec<ConnectionSettings>,
    logger: Arc<dyn Logger>,
}

impl GenaiCompletionService {
    /// Create a service over `connections`
    pub fn new(connections: Vec<ConnectionSettings>, logger: Arc<dyn Logger>) -> Self {
        Self { connections, logger }
    }

    fn client_for(&self, source_name: &str, context: &CompletionContext) -> CompletionResult<GenaiChatClient> {
        let connection = find_connection(&self.connections, source_name, context.connection_name.as_deref())
            .cloned()
            .unwrap_or_else(|| {
                ConnectionSettings::new(source_name, context.connection_name.as_deref().unwrap_or("default"))
            });

        let deployment = context
            .deployment_name
            .clone()
            .or_else(|| connection.default_deployment.clone())
            .ok_or_else(|| CompletionError::missing_deployment(source_name, &connection.name))?;

        Ok(GenaiChatClient::new(&connection, deployment, Arc::clone(&self.logger)))
    }

    /// Scoped entries carried by the context, limited to `tool_names`
    fn tools_for(context: &CompletionContext) -> Vec<ToolRegistryEntry> {
        if context.disable_tools {
            return Vec::new();
        }

        context
            .tools
            .iter()
            .filter(|t| context.tool_names.contains(&t.name))
            .cloned()
            .collect()
    }

    fn messages_for(messages: Vec<ChatMessage>, context: &CompletionContext) -> Vec<ChatMessage> {
        match context.system_message.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(system) => std::iter::once(ChatMessage::system(system)).chain(messages).collect(),
            None => messages,
        }
    }

    fn options_for(context: &CompletionContext, tools: Vec<ToolRegistryEntry>) -> ChatOptions {
        let mut options = ChatOptions::new();
        options.temperature = context.temperature;
        options.max_tokens = context.max_tokens;
        if !tools.is_empty() {
            options = options.with_tools(tools);
        }
        options
    }
}

#[async_trait]
impl CompletionService for GenaiCompletionService {
    async fn complete(
        &self,
        source_name: &str,
        messages: Vec<ChatMessage>,
        context: &CompletionContext,
        cancel: &CancellationToken,
    ) -> CompletionResult<String> {
        let client = self.client_for(source_name, context)?;
        let tools = Self::tools_for(context);

        client
            .complete(Self::messages_for(messages, context), Self::options_for(context, tools), cancel)
            .await
    }

    async fn complete_streaming(
        &self,
        source_name: &str,
        messages: Vec<ChatMessage>,
        context: CompletionContext,
        cancel: CancellationToken,
    ) -> CompletionResult<StreamResponse> {
        let client = self.client_for(source_name, &context)?;
        let tools = Self::tools_for(&context);

        self.logger.debug(&format!(
            "[GenaiCompletionService] Streaming via {} with {} tools",
            client.deployment(),
            tools.len()
        ));

        client
            .stream(Self::messages_for(messages, &context), Self::options_for(&context, tools), cancel)
            .await
    }
}
