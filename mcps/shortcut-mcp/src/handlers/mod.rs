//! Action handlers for the `shortcut` tool
//!
//! Organized by entity: search, story (get/update/comment/create), epic,
//! raw api passthrough, and help. Each handler is a single linear operation
//! that returns an [`Outcome`]; faults surface as [`ShortcutError`] and are
//! turned into error-flagged text by the server.

mod api;
mod epic;
mod help;
mod search;
mod story;

pub use api::api;
pub use epic::epic;
pub use help::{capability_description, HELP_TEXT};
pub use search::search;
pub use story::{comment, create, get, update};

use tracing::info;

use crate::cache::ReferenceCache;
use crate::params::{Action, IdRef, ShortcutParams};
use crate::resolve::resolve_id;
use crate::shortcut::{ApiClient, ShortcutError, ShortcutResult};

/// What a handler produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran; text describes the result
    Success(String),
    /// Nothing was changed; text tells the caller how to fix the request
    Guidance(String),
}

impl Outcome {
    pub fn text(&self) -> &str {
        match self {
            Outcome::Success(text) | Outcome::Guidance(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Outcome::Success(text) | Outcome::Guidance(text) => text,
        }
    }
}

/// Everything a handler needs: API client, reference cache, listing size
pub struct ShortcutService {
    pub(crate) client: ApiClient,
    pub(crate) cache: ReferenceCache,
    pub(crate) limit: usize,
}

impl ShortcutService {
    pub fn new(client: ApiClient, cache: ReferenceCache, limit: usize) -> Self {
        Self {
            client,
            cache,
            limit,
        }
    }

    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    /// Route a request to its handler
    pub async fn dispatch(&self, params: ShortcutParams) -> ShortcutResult<Outcome> {
        info!(action = ?params.action, "dispatching");

        match params.action {
            Action::Search => search(self, params.query).await,
            Action::Get => get(self, params.id.as_ref()).await,
            Action::Update => update(self, &params).await,
            Action::Comment => comment(self, &params).await,
            Action::Create => create(self, &params).await,
            Action::Epic => epic(self, params.id.as_ref()).await,
            Action::Api => api(self, &params).await,
            Action::Help => Ok(Outcome::Success(HELP_TEXT.to_string())),
        }
    }
}

/// Resolve the mandatory `id` field of an action
pub(crate) fn require_id(id: Option<&IdRef>, action: &str) -> ShortcutResult<u64> {
    let id = id.ok_or_else(|| ShortcutError::validation(format!("id is required for {action}")))?;
    resolve_id(&id.to_string())
}
