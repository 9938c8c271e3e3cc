//! Planning phase: an advisory model call naming the tools a turn will need

use std::collections::HashMap;
use std::sync::Arc;

use super::error::{OrchestrationError, OrchestrationResult};
use super::services::OrchestratorServices;
use crate::completion::{ChatClient, ChatOptions};
use crate::config::find_connection;
use crate::templates::PLANNING_TEMPLATE_ID;
use crate::types::{
    CancellationToken, ChatMessage, CompletionContext, MessageRole, OrchestrationContext,
    ToolRegistryEntry, ToolSource,
};

/// Placeholder used when a tool category is empty
const NO_TOOLS: &str = "(none)";

/// `- name: description` lines for the tools of one source
pub fn summarize_tools(tools: &[ToolRegistryEntry], source: ToolSource) -> String {
    let lines: Vec<String> = tools
        .iter()
        .filter(|t| t.source == source)
        .map(|t| format!("- {}: {}", t.name, t.description_or_empty()))
        .collect();

    if lines.is_empty() {
        NO_TOOLS.to_string()
    } else {
        lines.join("\n")
    }
}

/// The last `count` text turns of the history followed by the user message.
///
/// The user message is not repeated when history already ends with it.
pub fn planning_messages(context: &OrchestrationContext, count: usize) -> Vec<ChatMessage> {
    let text_turns: Vec<&ChatMessage> = context
        .conversation_history
        .iter()
        .filter(|m| m.is_text_turn())
        .collect();

    let mut messages: Vec<ChatMessage> = text_turns[text_turns.len().saturating_sub(count)..]
        .iter()
        .map(|m| (*m).clone())
        .collect();

    let already_last = messages.last().is_some_and(|m| {
        m.role == MessageRole::User && m.text().as_deref() == Some(context.user_message.as_str())
    });
    if !already_last && !context.user_message.trim().is_empty() {
        messages.push(ChatMessage::user(context.user_message.clone()));
    }

    messages
}

/// Runs the planning call with its model fallback chain
pub struct Planner {
    services: OrchestratorServices,
}

impl Planner {
    pub fn new(services: OrchestratorServices) -> Self {
        Self { services }
    }

    /// Ask a model which tools the turn needs.
    ///
    /// Returns `Ok(None)` when the call fails or yields no text; only
    /// cancellation is an error.
    pub async fn plan(
        &self,
        context: &OrchestrationContext,
        tools: &[ToolRegistryEntry],
        cancel: &CancellationToken,
    ) -> OrchestrationResult<Option<String>> {
        let logger = &self.services.logger;

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(OrchestrationError::Cancelled),
            outcome = self.request_plan(context, tools, cancel) => outcome,
        };

        match outcome {
            Ok(plan) => {
                let plan = plan.trim();
                if plan.is_empty() {
                    logger.info("[Planner] Planning returned no text");
                    return Ok(None);
                }
                logger.debug(&format!("[Planner] Plan produced ({} chars)", plan.len()));
                Ok(Some(plan.to_string()))
            }
            Err(OrchestrationError::Cancelled) => Err(OrchestrationError::Cancelled),
            Err(e) => {
                logger.warn(&format!("[Planner] Planning failed, continuing without a plan: {}", e));
                Ok(None)
            }
        }
    }

    async fn request_plan(
        &self,
        context: &OrchestrationContext,
        tools: &[ToolRegistryEntry],
        cancel: &CancellationToken,
    ) -> OrchestrationResult<String> {
        let options = &self.services.options;

        let args: HashMap<String, String> = [
            ("local_tools", ToolSource::Local),
            ("system_tools", ToolSource::System),
            ("mcp_tools", ToolSource::McpServer),
        ]
        .into_iter()
        .map(|(key, source)| (key.to_string(), summarize_tools(tools, source)))
        .collect();

        let system_prompt = self.services.templates.render(PLANNING_TEMPLATE_ID, &args)?;

        let mut messages = vec![ChatMessage::system(system_prompt)];
        messages.extend(planning_messages(context, options.planning_history_message_count));

        if let Some(client) = self.utility_client(context) {
            self.services.logger.info(&format!(
                "[Planner] Planning with deployment '{}'",
                client.deployment()
            ));
            let chat_options = ChatOptions::new()
                .with_temperature(options.planning_temperature)
                .with_max_tokens(options.planning_max_tokens);
            return Ok(client.complete(messages, chat_options, cancel).await?);
        }

        self.services
            .logger
            .info("[Planner] Planning with the completion service");

        let planning_context = CompletionContext {
            connection_name: context.completion_context.connection_name.clone(),
            deployment_name: context.completion_context.deployment_name.clone(),
            temperature: Some(options.planning_temperature),
            max_tokens: Some(options.planning_max_tokens),
            disable_tools: true,
            ..Default::default()
        };

        Ok(self
            .services
            .completion
            .complete(&context.source_name, messages, &planning_context, cancel)
            .await?)
    }

    /// Client for the connection's utility deployment, else its default deployment
    fn utility_client(&self, context: &OrchestrationContext) -> Option<Arc<dyn ChatClient>> {
        let factory = self.services.chat_clients.as_ref()?;
        let connection = find_connection(
            &self.services.connections,
            &context.source_name,
            context.completion_context.connection_name.as_deref(),
        )?;
        let deployment = connection
            .utility_deployment
            .as_deref()
            .or(connection.default_deployment.as_deref())?;

        match factory.create_chat_client(&context.source_name, connection, deployment) {
            Ok(client) => Some(client),
            Err(e) => {
                self.services.logger.warn(&format!(
                    "[Planner] Could not create client for '{}': {}",
                    deployment, e
                ));
                None
            }
        }
    }
}
