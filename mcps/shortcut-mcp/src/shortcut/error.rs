//! Error types for Shortcut API operations

use thiserror::Error;

/// Errors that can occur while serving a Shortcut action
#[derive(Error, Debug)]
pub enum ShortcutError {
    /// Identifier could not be parsed into a positive story/epic id
    #[error("invalid id \"{0}\" - expected a number, sc-123, or a Shortcut URL")]
    InvalidId(String),

    /// The resolved id has no remote entity
    #[error("{0} not found")]
    NotFound(String),

    /// HTTP 429 persisted through the whole retry budget
    #[error("rate limited by Shortcut API after {attempts} attempts")]
    RateLimited {
        /// Number of requests issued before giving up
        attempts: u32,
    },

    /// The API answered with a non-2xx status
    #[error("Shortcut API error {status}: {body}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Raw response text
        body: String,
    },

    /// A required action field was missing or malformed
    #[error("{0}")]
    Validation(String),

    /// The HTTP request itself failed (DNS, TLS, connection reset)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response did not have the expected shape
    #[error("failed to decode Shortcut response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ShortcutError {
    /// True when the upstream reported the entity as missing
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ShortcutError::NotFound(_) | ShortcutError::Upstream { status: 404, .. }
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ShortcutError::Validation(message.into())
    }
}

/// Result type alias for Shortcut operations
pub type ShortcutResult<T> = Result<T, ShortcutError>;
