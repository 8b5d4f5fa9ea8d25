//! Epic summary

use serde_json::json;

use super::{require_id, Outcome, ShortcutService};
use crate::format::format_epic;
use crate::params::IdRef;
use crate::shortcut::ShortcutResult;
use crate::types::{normalize_story_list, Epic};

/// Show an epic's progress and its stories
pub async fn epic(svc: &ShortcutService, id: Option<&IdRef>) -> ShortcutResult<Outcome> {
    let id = require_id(id, "epic")?;

    let epic: Epic = match svc.client.get_as(&format!("/epics/{id}")).await {
        Ok(epic) => epic,
        Err(e) if e.is_not_found() => return Ok(Outcome::Guidance(format!("Epic {id} not found."))),
        Err(e) => return Err(e),
    };

    let response = svc
        .client
        .post("/stories/search", &json!({ "epic_id": id }))
        .await?;
    let stories = normalize_story_list(response);
    let workflows = svc.cache.workflows().await?;

    Ok(Outcome::Success(format_epic(&epic, &stories, &workflows, svc.limit)))
}
