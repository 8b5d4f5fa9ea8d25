//! MCP Server implementation
//!
//! Exposes a single `shortcut` tool. Requests are routed by their `action`
//! field to the handlers module; the tool description is rebuilt at startup
//! from the workspace's workflows so the calling agent sees real state names.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mcp_common::{
    async_trait, text_error, text_success, EmbeddableError, EmbeddableMcp, EmbeddableResult,
    McpError,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::cache::ReferenceCache;
use crate::config::Config;
use crate::handlers::{capability_description, ShortcutService};
use crate::params::ShortcutParams;
use crate::shortcut::{ApiClient, HttpTransport};
use crate::types::Workflow;

const TOOL_NAME: &str = "shortcut";

/// The Shortcut MCP Server
#[derive(Clone)]
pub struct ShortcutMcpServer {
    service: Arc<ShortcutService>,
    tool_router: ToolRouter<Self>,
    instructions: String,
}

// ============================================================================
// Tool
// ============================================================================

#[tool_router]
impl ShortcutMcpServer {
    /// Wrap a service, describing the tool with the given workflows
    pub fn new(service: Arc<ShortcutService>, workflows: &[Workflow]) -> Self {
        let instructions = capability_description(workflows);

        let mut tool_router = Self::tool_router();
        if let Some(route) = tool_router.map.get_mut(TOOL_NAME) {
            route.attr.description = Some(instructions.clone().into());
        }

        Self {
            service,
            tool_router,
            instructions,
        }
    }

    /// Build the HTTP stack from config and load the workflows the tool
    /// description is built from
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(&config.api, config.token.clone())
            .context("failed to build HTTP client")?;
        let client = ApiClient::new(Arc::new(transport), &config.rate_limit);
        let cache = ReferenceCache::new(
            client.clone(),
            Duration::from_secs(config.cache.ttl_seconds),
        );
        let service = ShortcutService::new(client, cache, config.search.limit);

        let workflows = service
            .cache()
            .workflows()
            .await
            .context("failed to load workflows from Shortcut")?;

        let states: usize = workflows.iter().map(|wf| wf.states.len()).sum();
        info!(workflows = workflows.len(), states, "loaded workflow reference data");

        Ok(Self::new(Arc::new(service), &workflows))
    }

    #[tool(
        description = "Shortcut project management: search, get, update, comment, create, epic, api, help"
    )]
    async fn shortcut(
        &self,
        Parameters(params): Parameters<ShortcutParams>,
    ) -> Result<CallToolResult, McpError> {
        let action = params.action;
        match self.service.dispatch(params).await {
            Ok(outcome) => Ok(text_success(outcome.into_text())),
            Err(e) => {
                warn!(?action, error = %e, "action failed");
                Ok(text_error(format!("Error: {e}")))
            }
        }
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for ShortcutMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions.clone()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for ShortcutMcpServer {
    fn server_name(&self) -> &str {
        TOOL_NAME
    }

    fn server_description(&self) -> Option<&str> {
        Some(&self.instructions)
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            TOOL_NAME => {
                let params: ShortcutParams = serde_json::from_value(params)?;
                self.shortcut(Parameters(params)).await.map_err(Into::into)
            }
            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}
