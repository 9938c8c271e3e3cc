//! Tool scoping strategies

use serde::{Deserialize, Serialize};

use crate::config::OrchestratorOptions;
use crate::tools::scoring::{select, Selection};
use crate::types::{ToolRegistryEntry, ToolSource};

/// How a catalog above the scoping threshold is cut down to budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopingStrategy {
    /// Every tool competes on relevance; budget is `initial_tool_count`
    #[default]
    Uniform,
    /// Local and System tools are always included. MCP tools are ranked for
    /// the remaining `initial_tool_count` slots; the total is capped at
    /// `max_tool_count`.
    #[serde(rename = "exempt-builtin")]
    ExemptBuiltIn,
}

impl ScopingStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ScopingStrategy::Uniform => "uniform",
            ScopingStrategy::ExemptBuiltIn => "exempt-builtin",
        }
    }

    /// Choose tools for `scoring_text`
    pub fn select(
        &self,
        tools: &[ToolRegistryEntry],
        scoring_text: &str,
        options: &OrchestratorOptions,
    ) -> Selection {
        match self {
            ScopingStrategy::Uniform => select(tools, scoring_text, options.initial_tool_count),
            ScopingStrategy::ExemptBuiltIn => select_exempt(tools, scoring_text, options),
        }
    }
}

fn select_exempt(tools: &[ToolRegistryEntry], scoring_text: &str, options: &OrchestratorOptions) -> Selection {
    let (ranked, always): (Vec<_>, Vec<_>) = tools
        .iter()
        .cloned()
        .partition(|t| t.source == ToolSource::McpServer);

    let budget = options.initial_tool_count.saturating_sub(always.len());
    let scored = select(&ranked, scoring_text, budget);

    if always.is_empty() {
        return scored;
    }

    // Built-in tools carry no score, so the combined list is unscored
    let mut chosen = always;
    chosen.extend(scored.tools);
    chosen.truncate(options.max_tool_count);

    Selection {
        tools: chosen,
        scores: None,
    }
}
