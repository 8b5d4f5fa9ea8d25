//! Raw API passthrough

use reqwest::Method;
use serde_json::Value;
use tracing::info;

use super::{Outcome, ShortcutService};
use crate::params::ShortcutParams;
use crate::shortcut::{ShortcutError, ShortcutResult};

/// Send an arbitrary request to the Shortcut API
pub async fn api(svc: &ShortcutService, params: &ShortcutParams) -> ShortcutResult<Outcome> {
    let method = params
        .method
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ShortcutError::validation("method is required for api"))?;
    let method = Method::from_bytes(method.to_uppercase().as_bytes())
        .map_err(|_| ShortcutError::validation(format!("invalid HTTP method \"{method}\"")))?;

    let path = params
        .path
        .as_deref()
        .ok_or_else(|| ShortcutError::validation("path is required for api"))?;
    if !path.starts_with('/') {
        return Err(ShortcutError::validation(format!(
            "path must start with \"/\", got \"{path}\""
        )));
    }

    info!(%method, path, "raw api call");
    let response = svc.client.call(method, path, params.body.as_ref()).await?;

    let text = match response {
        Value::Null => "(empty response)".to_string(),
        Value::String(raw) => raw,
        other => serde_json::to_string_pretty(&other)?,
    };

    Ok(Outcome::Success(text))
}
