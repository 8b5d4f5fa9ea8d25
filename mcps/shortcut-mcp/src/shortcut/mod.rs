//! Shortcut REST API access
//!
//! Transport, client and error types for `api.app.shortcut.com`.

pub mod client;
pub mod error;
pub mod transport;

pub use client::ApiClient;
pub use error::{ShortcutError, ShortcutResult};
pub use transport::{HttpTransport, RawResponse, Transport};
