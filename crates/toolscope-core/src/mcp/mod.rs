//! MCP (Model Context Protocol) client module
//!
//! Uses the official rmcp SDK to connect to MCP servers and list the tools
//! they advertise. Supports Unix socket and HTTP transports.
//!
//! # Example
//!
//! ```rust,ignore
//! use toolscope_core::mcp::McpClient;
//! use toolscope_core::tools::McpToolProvider;
//! use std::sync::Arc;
//!
//! let client = McpClient::connect_http("http://localhost:8931/mcp", logger.clone()).await?;
//! let provider = McpToolProvider::new(logger).with_connection("github", Arc::new(client));
//! ```

mod client;

pub use client::{entry_from_mcp_tool, McpClient, McpError, McpResult};
