//! Story type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::null_as_default;

/// A unit of work (feature, bug or chore)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub story_type: Option<String>,

    #[serde(default)]
    pub estimate: Option<i64>,

    #[serde(default)]
    pub workflow_state_id: Option<i64>,

    #[serde(default)]
    pub epic_id: Option<i64>,

    #[serde(default)]
    pub iteration_id: Option<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<Label>,

    #[serde(default)]
    pub app_url: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A comment on a story, oldest first in the API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub author_id: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,
}

/// Extract stories from a search response
///
/// `POST /stories/search` returns a bare array, `GET /search/stories` wraps
/// results in `{"data": [...]}`. Anything else yields an empty list, and
/// entries that don't decode as stories are skipped.
pub fn normalize_story_list(value: Value) -> Vec<Story> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}
