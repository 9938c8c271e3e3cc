//! MCP Client using the official rmcp SDK
//!
//! Connects to MCP servers over Unix socket or HTTP and lists their tools.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::{
    ServiceExt,
    model::{ClientCapabilities, ClientInfo, Implementation, Tool},
    service::RunningService,
    RoleClient,
};
use thiserror::Error;

#[cfg(unix)]
use std::path::Path;
#[cfg(unix)]
use tokio::net::UnixStream;

use crate::logging::Logger;
use crate::tools::{McpToolSource, ToolProviderResult};
use crate::types::{ToolRegistryEntry, ToolSource};

/// MCP client errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

pub type McpResult<T> = Result<T, McpError>;

fn client_info() -> ClientInfo {
    ClientInfo {
        meta: None,
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "toolscope-core".to_string(),
            title: Some("Toolscope Core".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            website_url: None,
            icons: None,
        },
    }
}

/// Convert an MCP tool definition into a registry entry
pub fn entry_from_mcp_tool(tool: Tool) -> ToolRegistryEntry {
    let description = tool
        .description
        .map(|s| s.to_string())
        .filter(|s| !s.trim().is_empty());

    ToolRegistryEntry {
        name: tool.name.to_string(),
        description,
        source: ToolSource::McpServer,
        source_id: None,
        input_schema: serde_json::to_value(tool.input_schema.as_ref()).ok(),
    }
}

/// MCP client for one server connection
pub struct McpClient {
    /// The underlying rmcp running service
    client: RunningService<RoleClient, ClientInfo>,
    /// Logger
    logger: Arc<dyn Logger>,
}

impl McpClient {
    /// Connect to an MCP server over a Unix socket
    #[cfg(unix)]
    pub async fn connect_unix<P: AsRef<Path>>(
        socket_path: P,
        logger: Arc<dyn Logger>,
    ) -> McpResult<Self> {
        let path = socket_path.as_ref();
        logger.info(&format!("[McpClient] Connecting to Unix socket: {:?}", path));

        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| McpError::ConnectionFailed(e.to_string()))?;

        let client = client_info()
            .serve(stream)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        logger.info("[McpClient] Connected and initialized successfully");

        Ok(Self { client, logger })
    }

    /// Connect to an MCP server over HTTP (Streamable HTTP transport)
    pub async fn connect_http(
        url: &str,
        logger: Arc<dyn Logger>,
    ) -> McpResult<Self> {
        use rmcp::transport::StreamableHttpClientTransport;

        logger.info(&format!("[McpClient] Connecting to HTTP: {}", url));

        let transport = StreamableHttpClientTransport::from_uri(url);

        let client = client_info()
            .serve(transport)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        logger.info("[McpClient] Connected and initialized successfully");

        Ok(Self { client, logger })
    }

    /// List all available tools
    pub async fn list_tools(&self) -> McpResult<Vec<Tool>> {
        let result = self
            .client
            .list_tools(Default::default())
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;

        self.logger.debug(&format!(
            "[McpClient] Listed {} tools",
            result.tools.len()
        ));

        Ok(result.tools)
    }

    /// Get server info
    pub fn server_info(&self) -> Option<&Implementation> {
        self.client.peer_info().map(|info| &info.server_info)
    }

    /// Close the connection
    pub async fn close(self) -> McpResult<()> {
        self.logger.info("[McpClient] Closing connection");
        self.client
            .cancel()
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl McpToolSource for McpClient {
    async fn list_tool_entries(&self) -> ToolProviderResult<Vec<ToolRegistryEntry>> {
        let tools = self.list_tools().await?;
        Ok(tools.into_iter().map(entry_from_mcp_tool).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_mcp_tool() {
        let mut schema = serde_json::Map::new();
        schema.insert("type".to_string(), serde_json::json!("object"));

        let tool = Tool::new("create_issue", "Create a GitHub issue", Arc::new(schema));
        let entry = entry_from_mcp_tool(tool);

        assert_eq!(entry.name, "create_issue");
        assert_eq!(entry.description.as_deref(), Some("Create a GitHub issue"));
        assert_eq!(entry.source, ToolSource::McpServer);
        assert_eq!(entry.input_schema, Some(serde_json::json!({ "type": "object" })));
    }

    #[test]
    fn test_blank_description_is_dropped() {
        let tool = Tool::new("ping", "  ", Arc::new(serde_json::Map::new()));
        assert_eq!(entry_from_mcp_tool(tool).description, None);
    }
}
