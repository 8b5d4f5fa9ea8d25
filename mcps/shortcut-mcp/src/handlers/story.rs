//! Story handlers: get, update, comment, create

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{info, warn};

use super::{require_id, Outcome, ShortcutService};
use crate::format::{format_comments, format_story};
use crate::params::{IdRef, ShortcutParams};
use crate::resolve::{match_state, resolve_id, resolve_member, state_names};
use crate::shortcut::{ShortcutError, ShortcutResult};
use crate::types::{Member, Story, Workflow};

/// Characters of a comment echoed back after posting
const COMMENT_ECHO_CHARS: usize = 100;

fn story_not_found(id: u64) -> Outcome {
    Outcome::Guidance(format!("Story sc-{id} not found."))
}

fn state_guidance(state: &str, workflows: &[Workflow]) -> Outcome {
    Outcome::Guidance(format!(
        "State \"{}\" not found. Valid states: {}",
        state,
        state_names(workflows).join(", ")
    ))
}

async fn member_guidance(svc: &ShortcutService, owner: &str) -> ShortcutResult<Outcome> {
    let members = svc.cache.members().await?;
    let valid: Vec<String> = members.iter().map(Member::display).collect();
    Ok(Outcome::Guidance(format!(
        "Member \"{}\" not found. Valid members: {}",
        owner,
        valid.join(", ")
    )))
}

/// Fields shared by update and create that need no reference data
fn apply_fields(payload: &mut Map<String, Value>, params: &ShortcutParams) -> ShortcutResult<()> {
    if let Some(name) = &params.name {
        payload.insert("name".into(), json!(name));
    }
    if let Some(description) = &params.description {
        payload.insert("description".into(), json!(description));
    }
    if let Some(estimate) = params.estimate {
        payload.insert("estimate".into(), json!(estimate));
    }
    if let Some(story_type) = &params.story_type {
        payload.insert("story_type".into(), json!(story_type));
    }
    if let Some(epic) = &params.epic {
        payload.insert("epic_id".into(), json!(resolve_id(&epic.to_string())?));
    }
    if let Some(iteration) = &params.iteration {
        payload.insert("iteration_id".into(), json!(resolve_id(&iteration.to_string())?));
    }
    if let Some(labels) = &params.labels {
        let labels: Vec<Value> = labels.iter().map(|name| json!({"name": name})).collect();
        payload.insert("labels".into(), Value::Array(labels));
    }
    Ok(())
}

/// Show a story with its state name and latest comments
pub async fn get(svc: &ShortcutService, id: Option<&IdRef>) -> ShortcutResult<Outcome> {
    let id = require_id(id, "get")?;

    let story: Story = match svc.client.get_as(&format!("/stories/{id}")).await {
        Ok(story) => story,
        Err(e) if e.is_not_found() => return Ok(story_not_found(id)),
        Err(e) => return Err(e),
    };

    let workflows = svc.cache.workflows().await?;
    let mut text = format_story(&story, &workflows);

    if !story.comments.is_empty() {
        let members = match svc.cache.members().await {
            Ok(members) => members,
            Err(e) => {
                warn!(error = %e, "member lookup failed, showing author ids");
                Arc::new(Vec::new())
            }
        };
        if let Some(comments) = format_comments(&story.comments, &members) {
            text.push_str("\n\n");
            text.push_str(&comments);
        }
    }

    Ok(Outcome::Success(text))
}

/// Apply a partial update to a story
pub async fn update(svc: &ShortcutService, params: &ShortcutParams) -> ShortcutResult<Outcome> {
    let id = require_id(params.id.as_ref(), "update")?;
    let mut payload = Map::new();

    if let Some(state) = &params.state {
        let workflows = svc.cache.workflows().await?;
        match match_state(&workflows, state) {
            Some(state_id) => {
                payload.insert("workflow_state_id".into(), json!(state_id));
            }
            None => return Ok(state_guidance(state, &workflows)),
        }
    }

    if let Some(owner) = &params.owner {
        let Some(owner_id) = resolve_member(&svc.cache, owner).await? else {
            return member_guidance(svc, owner).await;
        };
        payload.insert("owner_ids".into(), json!([owner_id]));
    }

    apply_fields(&mut payload, params)?;

    if payload.is_empty() {
        return Ok(Outcome::Guidance(
            "No updates provided. Set one of: state, estimate, owner, type, name, description, epic, iteration, labels."
                .to_string(),
        ));
    }

    let fields: Vec<&str> = payload.keys().map(String::as_str).collect();
    info!(story = id, fields = %fields.join(","), "updating story");

    let response = match svc
        .client
        .put(&format!("/stories/{id}"), &Value::Object(payload))
        .await
    {
        Ok(response) => response,
        Err(e) if e.is_not_found() => return Ok(story_not_found(id)),
        Err(e) => return Err(e),
    };

    let story: Story = match serde_json::from_value(response) {
        Ok(story) => story,
        Err(e) => {
            warn!(story = id, error = %e, "update applied but response was not a story");
            return Ok(Outcome::Success(format!("Updated sc-{id}")));
        }
    };
    let workflows = svc.cache.workflows().await?;

    Ok(Outcome::Success(format!(
        "Updated sc-{}\n\n{}",
        id,
        format_story(&story, &workflows)
    )))
}

/// Post a comment on a story
pub async fn comment(svc: &ShortcutService, params: &ShortcutParams) -> ShortcutResult<Outcome> {
    let id = require_id(params.id.as_ref(), "comment")?;

    let text = match &params.body {
        Some(Value::String(text)) if !text.trim().is_empty() => text,
        _ => return Err(ShortcutError::validation("body is required for comment")),
    };

    match svc
        .client
        .post(&format!("/stories/{id}/comments"), &json!({ "text": text }))
        .await
    {
        Ok(_) => {}
        Err(e) if e.is_not_found() => return Ok(story_not_found(id)),
        Err(e) => return Err(e),
    }

    Ok(Outcome::Success(format!(
        "Comment added to sc-{}: \"{}\"",
        id,
        truncate(text, COMMENT_ECHO_CHARS)
    )))
}

/// Create a story; without a state it lands in the first workflow's
/// first unstarted state
pub async fn create(svc: &ShortcutService, params: &ShortcutParams) -> ShortcutResult<Outcome> {
    let name = params
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ShortcutError::validation("name is required for create"))?;

    let workflows = svc.cache.workflows().await?;
    let mut payload = Map::new();

    match &params.state {
        Some(state) => match match_state(&workflows, state) {
            Some(state_id) => {
                payload.insert("workflow_state_id".into(), json!(state_id));
            }
            None => return Ok(state_guidance(state, &workflows)),
        },
        None => {
            if let Some(default) = workflows.first().and_then(Workflow::first_unstarted) {
                payload.insert("workflow_state_id".into(), json!(default.id));
            }
        }
    }

    if let Some(owner) = &params.owner {
        let Some(owner_id) = resolve_member(&svc.cache, owner).await? else {
            return member_guidance(svc, owner).await;
        };
        payload.insert("owner_ids".into(), json!([owner_id]));
    }

    apply_fields(&mut payload, params)?;
    payload.insert("name".into(), json!(name));
    payload
        .entry("story_type")
        .or_insert_with(|| json!("feature"));

    let response = svc.client.post("/stories", &Value::Object(payload)).await?;
    let story: Story = match serde_json::from_value(response) {
        Ok(story) => story,
        Err(e) => {
            warn!(error = %e, "story created but response was not a story");
            return Ok(Outcome::Success(format!("Created story: {name}")));
        }
    };
    info!(story = story.id, "created story");

    Ok(Outcome::Success(format!(
        "Created sc-{}: {}\nURL: {}",
        story.id,
        story.name.as_deref().unwrap_or(name),
        story.app_url.as_deref().unwrap_or("none")
    )))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}
