//! The outcome of tool scoping

use serde::{Deserialize, Serialize};

use crate::tools::Selection;
use crate::types::{CompletionContext, ToolRegistryEntry};

/// Header of the plan section appended to the system message
pub const EXECUTION_PLAN_HEADER: &str = "[Execution Plan]";

/// Path the orchestrator took to choose tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopingPhase {
    /// Small catalog, every tool passed through
    DirectPass,
    /// Scored against the recent conversation, no model call
    Lightweight,
    /// Scored against the text of a planning call
    Planned,
}

impl std::fmt::Display for ScopingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopingPhase::DirectPass => write!(f, "direct-pass"),
            ScopingPhase::Lightweight => write!(f, "lightweight"),
            ScopingPhase::Planned => write!(f, "planned"),
        }
    }
}

/// Tools chosen for one request, plus the plan that guided the choice.
///
/// A plain value: callers merge it into their own request with `apply_to`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopingDecision {
    pub phase: ScopingPhase,
    /// Chosen tools, best first when scored
    pub tools: Vec<ToolRegistryEntry>,
    /// Relevance of each tool, when the tools were ranked
    pub scores: Option<Vec<f32>>,
    /// Planning call output
    pub plan: Option<String>,
}

impl ScopingDecision {
    /// Every tool, unscored
    pub fn direct_pass(tools: Vec<ToolRegistryEntry>) -> Self {
        Self {
            phase: ScopingPhase::DirectPass,
            tools,
            scores: None,
            plan: None,
        }
    }

    /// Decision built from a scored selection
    pub fn scoped(phase: ScopingPhase, selection: Selection, plan: Option<String>) -> Self {
        Self {
            phase,
            tools: selection.tools,
            scores: selection.scores,
            plan,
        }
    }

    /// Names of the chosen tools, in order
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name.clone()).collect()
    }

    /// Write the chosen tools and the plan into a completion context
    pub fn apply_to(&self, context: &mut CompletionContext) {
        context.tool_names = self.tool_names();
        context.tools = self.tools.clone();

        let Some(plan) = self.plan.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
            return;
        };

        let section = format!("{}\n{}", EXECUTION_PLAN_HEADER, plan);
        context.system_message = Some(match context.system_message.take() {
            Some(existing) if !existing.trim().is_empty() => format!("{}\n\n{}", existing, section),
            _ => section,
        });
    }
}
