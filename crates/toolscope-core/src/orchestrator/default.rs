//! The tiered scoping orchestrator
//!
//! ```text
//! Start ──► classify ──┬─► DirectPass ──────────────────┐
//!                      ├─► Planning ──► Scoping ────────┼─► Execute ──► Streaming
//!                      └─► Lightweight scoping ─────────┘
//! ```

use std::collections::HashSet;

use async_trait::async_trait;

use super::decision::{ScopingDecision, ScopingPhase};
use super::error::{OrchestrationError, OrchestrationResult};
use super::planning::Planner;
use super::services::OrchestratorServices;
use super::strategy::ScopingStrategy;
use super::stream::{relay, ResponseStream};
use super::Orchestrator;
use crate::logging::Logger;
use crate::types::{CancellationToken, ChatMessage, MessageRole, OrchestrationContext, ToolRegistryEntry, ToolSource};

/// Orchestrator choosing tools by catalog size, with an optional planning call
pub struct DefaultOrchestrator {
    name: String,
    strategy: ScopingStrategy,
    planner: Planner,
    services: OrchestratorServices,
}

impl DefaultOrchestrator {
    /// Create an orchestrator registered under `name`
    pub fn new(name: impl Into<String>, strategy: ScopingStrategy, services: OrchestratorServices) -> Self {
        Self {
            name: name.into(),
            strategy,
            planner: Planner::new(services.clone()),
            services,
        }
    }

    fn classify(&self, tools: &[ToolRegistryEntry]) -> ScopingPhase {
        let options = &self.services.options;
        let has_mcp = tools.iter().any(|t| t.source == ToolSource::McpServer);

        if tools.len() <= options.scoping_threshold {
            ScopingPhase::DirectPass
        } else if has_mcp || tools.len() > options.planning_threshold {
            ScopingPhase::Planned
        } else {
            ScopingPhase::Lightweight
        }
    }

    fn scope_against(
        &self,
        phase: ScopingPhase,
        tools: &[ToolRegistryEntry],
        scoring_text: &str,
        plan: Option<String>,
    ) -> ScopingDecision {
        let selection = self.strategy.select(tools, scoring_text, &self.services.options);
        if !selection.is_scored() {
            self.services.logger.debug(&format!(
                "[Orchestrator] Selection for '{}' is unscored",
                self.name
            ));
        }
        ScopingDecision::scoped(phase, selection, plan)
    }
}

/// Drop tools whose name was already seen, keeping the first in registry order
fn unique_by_name(tools: Vec<ToolRegistryEntry>, logger: &dyn Logger) -> Vec<ToolRegistryEntry> {
    let mut seen = HashSet::new();

    tools
        .into_iter()
        .filter(|tool| {
            let first = seen.insert(tool.name.clone());
            if !first {
                logger.warn(&format!(
                    "[Orchestrator] Duplicate tool '{}' from {} ignored",
                    tool.name,
                    tool.source_id.as_deref().unwrap_or("another provider")
                ));
            }
            first
        })
        .collect()
}

/// Last assistant text turn plus the user message
pub fn lightweight_scoring_text(context: &OrchestrationContext) -> String {
    match context.last_assistant_text() {
        Some(assistant) if !assistant.trim().is_empty() => {
            format!("{} {}", assistant, context.user_message)
        }
        _ => context.user_message.clone(),
    }
}

/// The conversation sent to the completion backend: history, then the user
/// message unless history already ends with it.
pub fn conversation_messages(context: &OrchestrationContext) -> Vec<ChatMessage> {
    let mut messages = context.conversation_history.clone();

    let already_last = messages.last().is_some_and(|m| {
        m.role == MessageRole::User && m.text().as_deref() == Some(context.user_message.as_str())
    });
    if !already_last {
        messages.push(ChatMessage::user(context.user_message.clone()));
    }

    messages
}

#[async_trait]
impl Orchestrator for DefaultOrchestrator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn scope(
        &self,
        context: &OrchestrationContext,
        cancel: &CancellationToken,
    ) -> OrchestrationResult<ScopingDecision> {
        context.validate()?;
        let logger = &self.services.logger;

        if context.completion_context.disable_tools {
            logger.info("[Orchestrator] Tools disabled for this request, skipping scoping");
            return Ok(ScopingDecision::direct_pass(Vec::new()));
        }

        let tools = self
            .services
            .registry
            .get_all(&context.completion_context, cancel)
            .await?;
        let tools = unique_by_name(tools, logger.as_ref());

        let phase = self.classify(&tools);
        logger.info(&format!(
            "[Orchestrator] {} tools available, phase: {} (strategy: {})",
            tools.len(),
            phase,
            self.strategy.name()
        ));

        let decision = match phase {
            ScopingPhase::DirectPass => ScopingDecision::direct_pass(tools),
            ScopingPhase::Planned => match self.planner.plan(context, &tools, cancel).await? {
                Some(plan) => {
                    let scoring_text = plan.clone();
                    self.scope_against(ScopingPhase::Planned, &tools, &scoring_text, Some(plan))
                }
                None => {
                    logger.info("[Orchestrator] No plan, falling back to lightweight scoping");
                    self.scope_against(ScopingPhase::Lightweight, &tools, &lightweight_scoring_text(context), None)
                }
            },
            ScopingPhase::Lightweight => {
                self.scope_against(ScopingPhase::Lightweight, &tools, &lightweight_scoring_text(context), None)
            }
        };

        logger.debug(&format!(
            "[Orchestrator] Scoped to {} tools: {}",
            decision.tools.len(),
            decision.tool_names().join(", ")
        ));

        Ok(decision)
    }

    async fn execute_streaming(
        &self,
        context: &OrchestrationContext,
        cancel: &CancellationToken,
    ) -> OrchestrationResult<ResponseStream> {
        let decision = self.scope(context, cancel).await?;

        if cancel.is_cancelled() {
            return Err(OrchestrationError::Cancelled);
        }

        let mut completion_context = context.completion_context.clone();
        decision.apply_to(&mut completion_context);

        self.services.logger.info(&format!(
            "[Orchestrator] Executing via '{}' with {} tools",
            context.source_name,
            completion_context.tool_names.len()
        ));

        let upstream = self
            .services
            .completion
            .complete_streaming(
                &context.source_name,
                conversation_messages(context),
                completion_context,
                cancel.clone(),
            )
            .await?;

        Ok(relay(upstream, cancel.clone()))
    }
}
