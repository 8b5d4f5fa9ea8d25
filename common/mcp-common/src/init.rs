//! Server initialization utilities

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging for MCP servers
///
/// Logs go to stderr; stdout carries the MCP protocol. `RUST_LOG` adds
/// filter directives on top of `info` for `crate_name`. Set
/// `LOG_FORMAT=json` for structured JSON output.
///
/// ```rust,ignore
/// mcp_common::init_tracing("shortcut_mcp")?;
/// ```
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let directive = format!("{}=info", crate_name);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let registry = tracing_subscriber::registry().with(filter);

    if json_requested(std::env::var("LOG_FORMAT").ok().as_deref()) {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}

fn json_requested(log_format: Option<&str>) -> bool {
    log_format.is_some_and(|v| v.eq_ignore_ascii_case("json"))
}
