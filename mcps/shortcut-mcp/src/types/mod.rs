//! Shortcut entity types
//!
//! Typed views of the JSON the API returns. Every attribute a formatter
//! reads is optional so partial or null fields never fail decoding.

mod epic;
mod member;
mod story;
mod workflow;

pub use epic::{Epic, EpicStats};
pub use member::{CurrentMember, Member, MemberProfile};
pub use story::{normalize_story_list, Comment, Label, Story};
pub use workflow::{Workflow, WorkflowState};

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
