//! Shortcut MCP Library
//!
//! A single `shortcut` tool for Shortcut stories, epics and workflows.
//! Agents refer to things the way people do (`sc-704`, "in progress",
//! "@ada", "me"); the server resolves those to API ids against cached
//! reference data and answers with compact text.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use shortcut_mcp::{config::Config, EmbeddableMcp, ShortcutMcpServer};
//!
//! let server = ShortcutMcpServer::connect(&Config::load()?).await?;
//! let result = server
//!     .call_tool("shortcut", serde_json::json!({"action": "get", "id": "sc-704"}))
//!     .await?;
//! ```
//!
//! # Usage as Binary
//!
//! ```json
//! { "mcpServers": { "shortcut": {
//!     "command": "./shortcut-mcp",
//!     "env": { "SHORTCUT_API_TOKEN": "..." }
//! } } }
//! ```

pub mod cache;
pub mod config;
pub mod format;
pub mod handlers;
pub mod params;
pub mod resolve;
pub mod server;
pub mod shortcut;
pub mod types;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;

// Re-export main server type
pub use server::ShortcutMcpServer;

// Re-export parameter types for direct API usage
pub use params::{Action, IdRef, SearchFilter, SearchQuery, ShortcutParams};

// Re-export EmbeddableMcp trait for in-process usage
pub use mcp_common::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
