//! Per-turn request context

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::message::ChatMessage;
use super::tool::ToolRegistryEntry;

/// Completion configuration handed to the completion backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionContext {
    /// Named connection of the provider (e.g. "primary")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_name: Option<String>,
    /// Deployment (model) override for the main completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_name: Option<String>,
    /// System message sent ahead of the conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
    /// Temperature for response generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Tools the user selected for this profile (feeds the local provider)
    pub selected_tool_names: Vec<String>,
    /// MCP connections enabled for this profile (feeds the MCP provider)
    pub mcp_connection_ids: Vec<String>,
    /// Tools exposed to the model, written from a scoping decision
    pub tool_names: Vec<String>,
    /// Registry entries behind `tool_names`, in the same order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolRegistryEntry>,
    /// When set, no tools are offered to the model
    pub disable_tools: bool,
}

impl CompletionContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection name
    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection_name = Some(connection.into());
        self
    }

    /// Set the system message
    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = Some(message.into());
        self
    }

    /// Set the user-selected tools
    pub fn with_selected_tools(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.selected_tool_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the enabled MCP connections
    pub fn with_mcp_connections(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.mcp_connection_ids = ids.into_iter().map(Into::into).collect();
        self
    }
}

/// Errors raised when an orchestration context is malformed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("source name is required")]
    MissingSourceName,
}

/// Everything the orchestrator needs for one user turn
#[derive(Debug, Clone)]
pub struct OrchestrationContext {
    /// Completion backend / provider to use
    pub source_name: String,
    /// Completion configuration
    pub completion_context: CompletionContext,
    /// Prior turns, oldest first
    pub conversation_history: Vec<ChatMessage>,
    /// Current user turn
    pub user_message: String,
}

impl OrchestrationContext {
    /// Create a context with empty history
    pub fn new(
        source_name: impl Into<String>,
        completion_context: CompletionContext,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            completion_context,
            conversation_history: Vec::new(),
            user_message: user_message.into(),
        }
    }

    /// Set the conversation history
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.conversation_history = history;
        self
    }

    /// Check the invariants required before scoping starts
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.source_name.trim().is_empty() {
            return Err(ContextError::MissingSourceName);
        }
        Ok(())
    }

    /// Text of the most recent assistant text turn, if any
    pub fn last_assistant_text(&self) -> Option<String> {
        self.conversation_history
            .iter()
            .rev()
            .find(|m| m.role == super::MessageRole::Assistant && m.is_text_turn())
            .and_then(|m| m.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentPart, MessageRole};
    use serde_json::json;

    #[test]
    fn test_validate_requires_source_name() {
        let ctx = OrchestrationContext::new("  ", CompletionContext::new(), "hi");
        assert_eq!(ctx.validate(), Err(ContextError::MissingSourceName));

        let ctx = OrchestrationContext::new("openai", CompletionContext::new(), "hi");
        assert!(ctx.validate().is_ok());
    }

    #[test]
    fn test_last_assistant_text_skips_tool_turns() {
        let ctx = OrchestrationContext::new("openai", CompletionContext::new(), "next")
            .with_history(vec![
                ChatMessage::user("find recipes"),
                ChatMessage::assistant("Here are three recipes"),
                ChatMessage::with_parts(
                    MessageRole::Assistant,
                    vec![ContentPart::tool_use("c1", "search", json!({}))],
                ),
            ]);

        assert_eq!(ctx.last_assistant_text().as_deref(), Some("Here are three recipes"));
    }

    #[test]
    fn test_completion_context_deserializes_with_defaults() {
        let ctx: CompletionContext =
            serde_json::from_str(r#"{"selected_tool_names":["a"]}"#).unwrap();
        assert_eq!(ctx.selected_tool_names, vec!["a".to_string()]);
        assert!(ctx.tool_names.is_empty());
        assert!(!ctx.disable_tools);
    }
}
