//! Parameter types for the `shortcut` tool
//!
//! One tool, discriminated by `action`. Which of the optional fields matter
//! depends on the action; handlers check their own requirements.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Supported actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Search,
    Get,
    Update,
    Comment,
    Create,
    Epic,
    Api,
    Help,
}

/// A story, epic or iteration reference given as a number or text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum IdRef {
    Number(u64),
    Text(String),
}

impl fmt::Display for IdRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdRef::Number(n) => write!(f, "{}", n),
            IdRef::Text(s) => f.write_str(s),
        }
    }
}

/// Free-text search or a structured filter
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SearchQuery {
    Text(String),
    Filter(SearchFilter),
}

/// Structured search filter; each field is resolved independently
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchFilter {
    #[schemars(description = "Owner name, @mention, or 'me'")]
    pub owner: Option<String>,

    #[schemars(description = "Workflow state name (fuzzy, e.g. 'in progress', 'done')")]
    pub state: Option<String>,

    #[schemars(description = "Epic id or URL")]
    pub epic: Option<IdRef>,

    #[schemars(description = "Iteration id")]
    pub iteration: Option<IdRef>,

    #[serde(rename = "type")]
    #[schemars(description = "Story type: feature, bug, or chore")]
    pub story_type: Option<String>,

    #[schemars(description = "Include archived stories")]
    pub archived: Option<bool>,
}

/// Parameters for the `shortcut` tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShortcutParams {
    #[schemars(description = "Action to perform: search, get, update, comment, create, epic, api, help")]
    pub action: Action,

    #[schemars(description = "search: Shortcut query text, or a filter object {owner, state, epic, iteration, type, archived}. Omit for your own open stories")]
    pub query: Option<SearchQuery>,

    #[schemars(description = "Story or epic id: 123, sc-123, or a Shortcut URL")]
    pub id: Option<IdRef>,

    #[schemars(description = "Workflow state name (fuzzy match)")]
    pub state: Option<String>,

    #[schemars(description = "Story point estimate")]
    pub estimate: Option<i64>,

    #[schemars(description = "Owner name, @mention, or 'me'")]
    pub owner: Option<String>,

    #[serde(rename = "type")]
    #[schemars(description = "Story type: feature, bug, or chore")]
    pub story_type: Option<String>,

    #[schemars(description = "Story name/title")]
    pub name: Option<String>,

    #[schemars(description = "Story description (markdown)")]
    pub description: Option<String>,

    #[schemars(description = "comment: comment text. api: JSON request body")]
    pub body: Option<Value>,

    #[schemars(description = "Epic id or URL to attach the story to")]
    pub epic: Option<IdRef>,

    #[schemars(description = "Iteration id")]
    pub iteration: Option<IdRef>,

    #[schemars(description = "Label names")]
    pub labels: Option<Vec<String>>,

    #[schemars(description = "api: HTTP method (GET, POST, PUT, DELETE)")]
    pub method: Option<String>,

    #[schemars(description = "api: path under /api/v3, starting with '/'")]
    pub path: Option<String>,
}
