//! Tools advertised by MCP servers

use std::sync::Arc;

use async_trait::async_trait;

use super::error::{ToolProviderError, ToolProviderResult};
use super::providers::ToolRegistryProvider;
use crate::logging::Logger;
use crate::types::{CancellationToken, CompletionContext, ToolRegistryEntry, ToolSource};

/// One MCP server connection able to list its tools
#[async_trait]
pub trait McpToolSource: Send + Sync {
    /// List the server's tools
    async fn list_tool_entries(&self) -> ToolProviderResult<Vec<ToolRegistryEntry>>;
}

/// Aggregates tools from the MCP connections a completion has enabled.
///
/// A connection that fails is logged and skipped so one unreachable server
/// does not hide the others. Cancellation is returned immediately.
pub struct McpToolProvider {
    connections: Vec<(String, Arc<dyn McpToolSource>)>,
    logger: Arc<dyn Logger>,
}

impl McpToolProvider {
    /// Create a provider without connections
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            connections: Vec::new(),
            logger,
        }
    }

    /// Register a connection under its id
    pub fn with_connection(mut self, id: impl Into<String>, source: Arc<dyn McpToolSource>) -> Self {
        self.connections.push((id.into(), source));
        self
    }
}

#[async_trait]
impl ToolRegistryProvider for McpToolProvider {
    fn name(&self) -> &str {
        "mcp"
    }

    async fn get_tools(
        &self,
        context: &CompletionContext,
        cancel: &CancellationToken,
    ) -> ToolProviderResult<Vec<ToolRegistryEntry>> {
        let mut tools = Vec::new();

        for id in &context.mcp_connection_ids {
            let Some((_, source)) = self.connections.iter().find(|(cid, _)| cid == id) else {
                self.logger.warn(&format!(
                    "[McpToolProvider] Unknown MCP connection '{}', skipping",
                    id
                ));
                continue;
            };

            let listed = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ToolProviderError::Cancelled),
                listed = source.list_tool_entries() => listed,
            };

            match listed {
                Ok(entries) => {
                    self.logger.debug(&format!(
                        "[McpToolProvider] Connection '{}' offered {} tools",
                        id,
                        entries.len()
                    ));
                    tools.extend(entries.into_iter().map(|mut entry| {
                        entry.source = ToolSource::McpServer;
                        entry.source_id = Some(id.clone());
                        entry
                    }));
                }
                Err(ToolProviderError::Cancelled) => return Err(ToolProviderError::Cancelled),
                Err(e) => {
                    self.logger.warn(&format!(
                        "[McpToolProvider] Failed to list tools of connection '{}': {}",
                        id, e
                    ));
                }
            }
        }

        Ok(tools)
    }
}
