//! Tool orchestration
//!
//! Decides which tools a completion sees and drives the streamed response:
//!
//! 1. collect every tool from the `ToolRegistry`
//! 2. classify the catalog by size and source
//! 3. optionally ask a model for a plan
//! 4. score and cut the catalog down to budget
//! 5. stream the completion with the chosen tools
//!
//! Orchestrators are looked up by name through the `OrchestratorResolver`.

mod decision;
mod default;
mod error;
mod planning;
mod resolver;
mod services;
mod strategy;
mod stream;
#[cfg(test)]
mod test_support;

use async_trait::async_trait;

use crate::types::{CancellationToken, OrchestrationContext};

pub use decision::{ScopingDecision, ScopingPhase, EXECUTION_PLAN_HEADER};
pub use default::{conversation_messages, lightweight_scoring_text, DefaultOrchestrator};
pub use error::{OrchestrationError, OrchestrationResult};
pub use planning::{planning_messages, summarize_tools, Planner};
pub use resolver::{
    OrchestratorDefinition, OrchestratorFactory, OrchestratorResolver, EXEMPT_BUILTIN_ORCHESTRATOR_NAME,
};
pub use services::OrchestratorServices;
pub use strategy::ScopingStrategy;
pub use stream::{relay, ResponseStream};

/// Chooses tools for a turn and streams the completion
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Name the orchestrator is registered under
    fn name(&self) -> &str;

    /// Decide which tools the completion will see.
    ///
    /// Pure with respect to the context: nothing is written back.
    async fn scope(
        &self,
        context: &OrchestrationContext,
        cancel: &CancellationToken,
    ) -> OrchestrationResult<ScopingDecision>;

    /// Scope the tools, then stream the completion
    async fn execute_streaming(
        &self,
        context: &OrchestrationContext,
        cancel: &CancellationToken,
    ) -> OrchestrationResult<ResponseStream>;
}
