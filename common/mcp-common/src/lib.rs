//! MCP Common - Shared utilities for MCP servers
//!
//! - **Initialization**: [`init_tracing`] for stderr logging
//! - **Results**: helpers for text `CallToolResult` responses
//! - **Embeddable**: [`EmbeddableMcp`] trait for in-process execution
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use shortcut_mcp::ShortcutMcpServer;
//!
//! let server = ShortcutMcpServer::connect(&config).await?;
//! let result = server
//!     .call_tool("shortcut", serde_json::json!({"action": "help"}))
//!     .await?;
//! ```

pub mod embeddable;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use init::init_tracing;
pub use result::{first_text, text_error, text_success};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
