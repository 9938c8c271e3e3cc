//! Toolscope Core
//!
//! Chooses which tools a language-model completion gets to see, then drives
//! the completion as a stream.
//!
//! Large tool catalogs (dozens of MCP server tools plus local and built-in
//! ones) are cut down to a small, relevant set per turn:
//!
//! - catalogs at or below the scoping threshold pass through untouched
//! - mid-size catalogs are ranked against the recent conversation
//! - large catalogs, or any catalog with MCP tools, are ranked against the
//!   output of a quick planning call
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolscope_core::{
//!     CancellationToken, CompletionContext, FileSettingsProvider, OrchestrationContext,
//!     OrchestratorResolver, OrchestratorServices,
//! };
//!
//! let settings = FileSettingsProvider::user().settings()?;
//! let services = OrchestratorServices::new(registry, completion, templates, logger)
//!     .with_settings(&settings);
//! let resolver = OrchestratorResolver::with_builtins(services, Some(&settings.default_orchestrator));
//! let orchestrator = resolver.resolve(None);
//!
//! let context = OrchestrationContext::new("openai", CompletionContext::new(), "Email the report to Bob");
//! let mut stream = orchestrator.execute_streaming(&context, &CancellationToken::new()).await?;
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?.as_text().unwrap_or_default());
//! }
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod tokenizer;
pub mod tools;
pub mod mcp;
pub mod completion;
pub mod templates;
pub mod orchestrator;

// Re-export commonly used types
pub use types::{
    ChatMessage, ContentPart, MessageRole, MessageContent,
    ToolCall, ToolRegistryEntry, ToolSource,
    StreamChunk,
    CancellationToken,
    CompletionContext, ContextError, OrchestrationContext,
};

pub use logging::{Logger, NoOpLogger, ConsoleLogger, TracingLogger};

pub use config::{
    ConfigError, ConfigResult, ConnectionSettings, FileSettingsProvider, OrchestratorOptions, Settings,
};

pub use tokenizer::{tokenize, TokenSet};

pub use tools::{
    LocalToolProvider, McpToolProvider, SystemToolProvider, ToolProviderError, ToolRegistry,
    ToolRegistryProvider,
};

pub use completion::{
    ChatClient, ChatClientFactory, CompletionError, CompletionService,
    GenaiChatClientFactory, GenaiCompletionService, MockCompletionService,
};

pub use templates::{MemoryTemplateService, TemplateError, TemplateService, PLANNING_TEMPLATE_ID};

pub use orchestrator::{
    DefaultOrchestrator, OrchestrationError, OrchestrationResult, Orchestrator, OrchestratorResolver,
    OrchestratorServices, ResponseStream, ScopingDecision, ScopingPhase, ScopingStrategy,
};

// MCP client using official rmcp SDK
pub use mcp::{McpClient, McpError, McpResult};
