//! Story search

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::{Outcome, ShortcutService};
use crate::format::format_story_list;
use crate::params::{SearchFilter, SearchQuery};
use crate::resolve::{resolve_id, resolve_member, resolve_state};
use crate::shortcut::ShortcutResult;
use crate::types::normalize_story_list;

/// Search stories
///
/// - no query: the token owner's unarchived stories
/// - text: passed through as Shortcut search syntax
/// - filter: each field resolved to ids; fields that don't resolve are dropped
pub async fn search(svc: &ShortcutService, query: Option<SearchQuery>) -> ShortcutResult<Outcome> {
    let response = match query {
        Some(SearchQuery::Text(text)) if !text.trim().is_empty() => {
            let encoded: String = url::form_urlencoded::byte_serialize(text.trim().as_bytes()).collect();
            let path = format!("/search/stories?query={}&page_size={}", encoded, svc.limit);
            svc.client.get(&path).await?
        }
        Some(SearchQuery::Filter(filter)) => {
            let body = filter_body(svc, &filter).await?;
            debug!(?body, "structured story search");
            svc.client.post("/stories/search", &Value::Object(body)).await?
        }
        _ => {
            let me = svc.cache.current_member().await?;
            let body = json!({"owner_ids": [me.id], "archived": false});
            svc.client.post("/stories/search", &body).await?
        }
    };

    let stories = normalize_story_list(response);
    let workflows = svc.cache.workflows().await?;

    Ok(Outcome::Success(format_story_list(
        Some(stories.as_slice()),
        &workflows,
        svc.limit,
    )))
}

async fn filter_body(svc: &ShortcutService, filter: &SearchFilter) -> ShortcutResult<Map<String, Value>> {
    let mut body = Map::new();

    if let Some(owner) = &filter.owner {
        match resolve_member(&svc.cache, owner).await? {
            Some(id) => {
                body.insert("owner_ids".into(), json!([id]));
            }
            None => warn!(owner = %owner, "no member matched, owner filter dropped"),
        }
    }

    if let Some(state) = &filter.state {
        match resolve_state(&svc.cache, state).await? {
            Some(id) => {
                body.insert("workflow_state_id".into(), json!(id));
            }
            None => warn!(state = %state, "no state matched, state filter dropped"),
        }
    }

    if let Some(epic) = &filter.epic {
        match resolve_id(&epic.to_string()) {
            Ok(id) => {
                body.insert("epic_id".into(), json!(id));
            }
            Err(e) => warn!(error = %e, "epic filter dropped"),
        }
    }

    if let Some(iteration) = &filter.iteration {
        match resolve_id(&iteration.to_string()) {
            Ok(id) => {
                body.insert("iteration_id".into(), json!(id));
            }
            Err(e) => warn!(error = %e, "iteration filter dropped"),
        }
    }

    if let Some(story_type) = &filter.story_type {
        body.insert("story_type".into(), json!(story_type));
    }

    if let Some(archived) = filter.archived {
        body.insert("archived".into(), json!(archived));
    }

    Ok(body)
}
