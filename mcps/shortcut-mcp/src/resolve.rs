//! Resolution of human-friendly identifiers
//!
//! Maps story/epic references, workflow state names and member names to the
//! ids the API expects. The matching functions are pure over reference data;
//! the `async` wrappers pull that data from the [`ReferenceCache`].

use std::sync::LazyLock;

use regex::Regex;

use crate::cache::ReferenceCache;
use crate::shortcut::{ShortcutError, ShortcutResult};
use crate::types::{Member, Workflow, WorkflowState};

static STORY_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"story/(\d+)").expect("story url pattern"));
static EPIC_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"epic/(\d+)").expect("epic url pattern"));
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").expect("digit pattern"));

/// Informal state names, grouped under the label searched for in real names.
/// Buckets are tried in declaration order.
const STATE_ALIASES: &[(&str, &[&str])] = &[
    (
        "done",
        &["done", "complete", "completed", "finished", "closed", "resolved", "shipped", "merged"],
    ),
    (
        "in progress",
        &["in progress", "in-progress", "progress", "started", "doing", "wip", "working", "active"],
    ),
    (
        "ready",
        &["ready", "todo", "to do", "to-do", "backlog", "queued", "unstarted"],
    ),
    (
        "review",
        &["review", "in review", "code review", "reviewing", "qa", "testing"],
    ),
];

/// Parse a story or epic reference into its numeric id
///
/// Accepts `123`, `sc-123`, and URLs containing `/story/123` or `/epic/123`.
pub fn resolve_id(input: &str) -> ShortcutResult<u64> {
    for pattern in [&*STORY_URL, &*EPIC_URL, &*DIGITS] {
        let id = pattern
            .captures(input)
            .and_then(|caps| caps[1].parse::<u64>().ok())
            .filter(|id| *id > 0);

        if let Some(id) = id {
            return Ok(id);
        }
    }

    Err(ShortcutError::InvalidId(input.trim().to_string()))
}

fn all_states(workflows: &[Workflow]) -> impl Iterator<Item = &WorkflowState> {
    workflows.iter().flat_map(|wf| wf.states.iter())
}

/// Find a workflow state id by name
///
/// Case-insensitive. Tries an exact name, then a name containing the input,
/// then the alias buckets. The first hit in workflow order wins.
pub fn match_state(workflows: &[Workflow], name: &str) -> Option<i64> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(state) = all_states(workflows).find(|s| s.name.to_lowercase() == needle) {
        return Some(state.id);
    }

    if let Some(state) = all_states(workflows).find(|s| s.name.to_lowercase().contains(&needle)) {
        return Some(state.id);
    }

    for (label, synonyms) in STATE_ALIASES {
        let in_bucket = synonyms
            .iter()
            .any(|syn| syn.contains(needle.as_str()) || needle.contains(syn));
        if !in_bucket {
            continue;
        }

        if let Some(state) = all_states(workflows).find(|s| s.name.to_lowercase().contains(label)) {
            return Some(state.id);
        }
    }

    None
}

/// Display name of a state id, or the id itself when unknown
pub fn state_name(workflows: &[Workflow], state_id: i64) -> String {
    all_states(workflows)
        .find(|s| s.id == state_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| state_id.to_string())
}

/// Every state name across all workflows, in order
pub fn state_names(workflows: &[Workflow]) -> Vec<&str> {
    all_states(workflows).map(|s| s.name.as_str()).collect()
}

/// Find a member whose display name or mention handle contains the input
pub fn match_member<'a>(members: &'a [Member], input: &str) -> Option<&'a Member> {
    let needle = input.trim().trim_start_matches('@').to_lowercase();
    if needle.is_empty() {
        return None;
    }

    members.iter().find(|m| {
        m.profile.name.to_lowercase().contains(&needle)
            || m.profile.mention_name.to_lowercase().contains(&needle)
    })
}

/// Resolve a state name against the cached workflows
pub async fn resolve_state(cache: &ReferenceCache, name: &str) -> ShortcutResult<Option<i64>> {
    let workflows = cache.workflows().await?;
    Ok(match_state(&workflows, name))
}

/// Resolve a member reference to a member id; `me` is the token owner
pub async fn resolve_member(cache: &ReferenceCache, input: &str) -> ShortcutResult<Option<String>> {
    if input.trim().eq_ignore_ascii_case("me") {
        return Ok(Some(cache.current_member().await?.id.clone()));
    }

    let members = cache.members().await?;
    Ok(match_member(&members, input).map(|m| m.id.clone()))
}
