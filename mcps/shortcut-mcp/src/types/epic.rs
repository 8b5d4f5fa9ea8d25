//! Epic type

use serde::{Deserialize, Serialize};

/// A grouping of related stories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Epic {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    /// Epic state (`to do`, `in progress`, `done`)
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub stats: Option<EpicStats>,

    #[serde(default)]
    pub app_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpicStats {
    #[serde(default)]
    pub num_stories_total: Option<u64>,

    #[serde(default)]
    pub num_stories_done: Option<u64>,
}
