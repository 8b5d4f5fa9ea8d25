//! Static reference text and the startup capability description

use crate::types::Workflow;

pub const HELP_TEXT: &str = "\
Shortcut tool - actions

search   Find stories.
         query omitted: your own unarchived stories
         query \"text\": Shortcut search syntax, e.g. \"owner:ada state:started\"
         query {owner, state, epic, iteration, type, archived}: structured filter
get      Show a story with its state and the 5 latest comments. Needs id.
update   Change a story. Needs id plus any of: state, estimate, owner, type,
         name, description, epic, iteration, labels.
comment  Add a comment. Needs id and body.
create   New story. Needs name; optional state (defaults to the first
         unstarted state), type (default feature), owner, estimate,
         description, epic, iteration, labels.
epic     Show an epic's progress and up to 25 of its stories. Needs id.
api      Raw request. Needs method and path (starting with /); optional body.
help     This text.

Identifiers: 123, sc-123, or a Shortcut story/epic URL.
States match case-insensitively and loosely (\"in prog\", \"wip\", \"done\").
Owners match by name or @mention; \"me\" is you.";

/// Tool description built from the workspace's workflows
pub fn capability_description(workflows: &[Workflow]) -> String {
    let mut out = String::from(
        "Shortcut project management. Set `action` to one of: search, get, update, \
         comment, create, epic, api, help. Stories accept 123, sc-123 or a URL; \
         owners accept a name, @mention or \"me\"; states match loosely.",
    );

    if !workflows.is_empty() {
        out.push_str("\n\nWorkflow states:");
        for workflow in workflows {
            let states: Vec<&str> = workflow.states.iter().map(|s| s.name.as_str()).collect();
            out.push_str(&format!("\n- {}: {}", workflow.name, states.join(", ")));
        }
    }

    out
}
