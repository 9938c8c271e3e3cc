//! Tool sources, aggregation and relevance scoring
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ToolRegistry                               │
//! │                                             │
//! │  - Queries every provider per request       │
//! │  - Skips providers that fail                │
//! │  - Relevance search over the result         │
//! └─────────────────────────────────────────────┘
//!      │               │                  │
//!      ▼               ▼                  ▼
//!  LocalToolProvider  SystemToolProvider  McpToolProvider
//!  (user selection)   (enabled features)  (MCP connections)
//! ```

mod error;
mod providers;
mod mcp_provider;
mod registry;
pub mod scoring;

pub use error::{ToolProviderError, ToolProviderResult};
pub use providers::{LocalToolProvider, StaticToolProvider, SystemToolProvider, ToolRegistryProvider};
pub use mcp_provider::{McpToolProvider, McpToolSource};
pub use registry::ToolRegistry;
pub use scoring::{relevance_score, ScoredTool, Selection};
