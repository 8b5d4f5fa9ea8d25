//! In-process execution of MCP servers
//!
//! [`EmbeddableMcp`] lets a host call a server's tools directly, without a
//! stdio transport in between. Arguments are the same JSON objects an MCP
//! client would send.

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Error type for embeddable MCP operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Arguments did not deserialize into the tool's parameter type
    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),

    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// An MCP server whose tools can be called in-process
///
/// Servers built on `#[tool_router]` list their tools through the router
/// and dispatch `call_tool` by name to the tool methods.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Name used for the server in MCP configuration files
    fn server_name(&self) -> &str;

    fn list_tools(&self) -> Vec<Tool>;

    /// Run a tool by name with a JSON object of arguments
    ///
    /// Tool-level failures come back as an error-flagged [`CallToolResult`];
    /// `Err` is reserved for unknown tools and malformed arguments.
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }
}
