//! Member reference data

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A user account in the workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub profile: MemberProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub mention_name: String,
}

/// The member that owns the API token (`GET /member`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentMember {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub mention_name: Option<String>,
}

impl Member {
    /// `name (@mention)` as shown in guidance messages
    pub fn display(&self) -> String {
        format!("{} (@{})", self.profile.name, self.profile.mention_name)
    }
}
