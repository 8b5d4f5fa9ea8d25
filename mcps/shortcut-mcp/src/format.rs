//! Text rendering of stories and epics
//!
//! All functions are total: missing fields render as `Untitled`, `?` or
//! `none` instead of failing.

use crate::resolve::state_name;
use crate::types::{Comment, Epic, Member, Story, Workflow};

/// Returned for an empty or absent story list
pub const NO_STORIES: &str = "No stories found.";

/// Number of comments shown under a story
pub const RECENT_COMMENTS: usize = 5;

fn or_placeholder<T: ToString>(value: Option<T>, placeholder: &str) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| placeholder.to_string())
}

fn story_state(story: &Story, workflows: &[Workflow]) -> String {
    story
        .workflow_state_id
        .map(|id| state_name(workflows, id))
        .unwrap_or_else(|| "?".to_string())
}

/// Full story summary
pub fn format_story(story: &Story, workflows: &[Workflow]) -> String {
    let labels = if story.labels.is_empty() {
        "none".to_string()
    } else {
        story
            .labels
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut out = format!(
        "sc-{}: {}\nType: {} | State: {} | Estimate: {}\nEpic: {} | Iteration: {}\nLabels: {}\nURL: {}",
        story.id,
        story.name.as_deref().unwrap_or("Untitled"),
        story.story_type.as_deref().unwrap_or("?"),
        story_state(story, workflows),
        or_placeholder(story.estimate, "none"),
        or_placeholder(story.epic_id, "none"),
        or_placeholder(story.iteration_id, "none"),
        labels,
        story.app_url.as_deref().unwrap_or("none"),
    );

    if let Some(description) = story.description.as_deref().map(str::trim) {
        if !description.is_empty() {
            out.push_str("\n\n");
            out.push_str(description);
        }
    }

    out
}

/// The most recent comments, oldest of them first
pub fn format_comments(comments: &[Comment], members: &[Member]) -> Option<String> {
    if comments.is_empty() {
        return None;
    }

    let start = comments.len().saturating_sub(RECENT_COMMENTS);
    let shown = &comments[start..];

    let mut out = format!("Recent comments ({} of {}):", shown.len(), comments.len());
    for comment in shown {
        let author = comment
            .author_id
            .as_deref()
            .map(|id| {
                members
                    .iter()
                    .find(|m| m.id == id)
                    .map(|m| m.profile.name.clone())
                    .unwrap_or_else(|| id.to_string())
            })
            .unwrap_or_else(|| "?".to_string());

        out.push_str(&format!(
            "\n- {} ({}): {}",
            author,
            comment.created_at.as_deref().unwrap_or("?"),
            comment.text.as_deref().unwrap_or("").trim()
        ));
    }

    Some(out)
}

/// One line per story, at most `limit` lines plus a remainder count
pub fn format_story_list(stories: Option<&[Story]>, workflows: &[Workflow], limit: usize) -> String {
    let stories = match stories {
        Some(stories) if !stories.is_empty() => stories,
        _ => return NO_STORIES.to_string(),
    };

    let noun = if stories.len() == 1 { "story" } else { "stories" };
    let mut out = format!("Found {} {}:", stories.len(), noun);

    for story in stories.iter().take(limit) {
        out.push_str(&format!(
            "\n- sc-{} [{}] {} ({})",
            story.id,
            story.story_type.as_deref().unwrap_or("?"),
            story.name.as_deref().unwrap_or("Untitled"),
            story_state(story, workflows),
        ));
    }

    if stories.len() > limit {
        out.push_str(&format!("\n... and {} more", stories.len() - limit));
    }

    out
}

/// Epic header with progress, followed by its stories
pub fn format_epic(epic: &Epic, stories: &[Story], workflows: &[Workflow], limit: usize) -> String {
    let stats = epic.stats.clone().unwrap_or_default();

    format!(
        "Epic {}: {}\nState: {} | Progress: {}/{} stories done\nURL: {}\n\nStories:\n{}",
        epic.id,
        epic.name.as_deref().unwrap_or("Untitled"),
        epic.state.as_deref().unwrap_or("?"),
        or_placeholder(stats.num_stories_done, "?"),
        or_placeholder(stats.num_stories_total, "?"),
        epic.app_url.as_deref().unwrap_or("none"),
        format_story_list(Some(stories), workflows, limit),
    )
}
