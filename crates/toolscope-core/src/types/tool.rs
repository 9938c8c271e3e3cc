//! Tool registry entries and tool calls

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a tool comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolSource {
    /// Explicitly selected by the user for this completion
    Local,
    /// Available whenever its feature is enabled
    System,
    /// Advertised by an external MCP server
    McpServer,
}

impl std::fmt::Display for ToolSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolSource::Local => write!(f, "local"),
            ToolSource::System => write!(f, "system"),
            ToolSource::McpServer => write!(f, "mcp_server"),
        }
    }
}

/// One capability that can be exposed to the model.
///
/// Built fresh on every orchestration call; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRegistryEntry {
    /// Tool name (function name)
    pub name: String,
    /// Description used for relevance scoring and planning summaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Source category
    pub source: ToolSource,
    /// Identifier of the concrete source (e.g. MCP connection id)
    #[serde(rename = "sourceId", default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema", default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ToolRegistryEntry {
    /// Create a new entry
    pub fn new(name: impl Into<String>, source: ToolSource) -> Self {
        Self {
            name: name.into(),
            description: None,
            source,
            source_id: None,
            input_schema: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the concrete source identifier
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Set the input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    /// Description or an empty string
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Text matched against the scoring query: name followed by description
    pub fn relevance_text(&self) -> String {
        format!("{} {}", self.name, self.description_or_empty())
    }
}

/// Tool call emitted by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Name of the tool being called
    pub name: String,
    /// Input arguments for the tool
    pub input: Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}
