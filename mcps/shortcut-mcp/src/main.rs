//! Shortcut MCP Server
//!
//! # Configuration
//! `SHORTCUT_API_TOKEN` is required. Optional settings live in
//! `~/.config/shortcut-mcp/config.toml` (or `SHORTCUT_MCP_CONFIG_PATH`).

use rmcp::{transport::stdio, ServiceExt};

use shortcut_mcp::config::Config;
use shortcut_mcp::ShortcutMcpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mcp_common::init_tracing("shortcut_mcp")?;

    tracing::info!("Starting Shortcut MCP Server");

    let config = Config::load().inspect_err(|e| tracing::error!("Configuration error: {e:#}"))?;
    tracing::info!("Shortcut API: {}", config.api.base_url);

    let server = ShortcutMcpServer::connect(&config)
        .await
        .inspect_err(|e| tracing::error!("Startup failed: {e:#}"))?;
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
