//! Workflow reference data

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// An ordered set of states a story can occupy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub states: Vec<WorkflowState>,
}

/// A named state within a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// One of `unstarted`, `started`, `done`
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub state_type: String,
}

impl Workflow {
    /// First state of type `unstarted`, used as the default for new stories
    pub fn first_unstarted(&self) -> Option<&WorkflowState> {
        self.states.iter().find(|s| s.state_type == "unstarted")
    }
}
