//! Slack text rendering for project records.

use crate::record::ProjectRecord;
use crate::store::ProjectMap;

/// Shown by `list` when nobody has added a project yet.
pub const EMPTY_LIST_MESSAGE: &str =
    "📭 No projects yet. Start one with `/project add <description>`.";

const LIST_HEADER: &str = "📋 *Team Projects*";

/// Render one owner's block: description, tags if any, then updates.
pub fn render_record(owner_id: &str, record: &ProjectRecord) -> String {
    let mut lines = vec![format!("*<@{}>*: {}", owner_id, record.description)];
    if !record.tags.is_empty() {
        lines.push(format!("Tags: {}", record.tags.join(" ")));
    }
    lines.extend(record.updates.iter().map(|update| format!("• {}", update)));
    lines.join("\n")
}

/// Render the whole store, or [`EMPTY_LIST_MESSAGE`] when it is empty.
pub fn render_list(projects: &ProjectMap) -> String {
    if projects.is_empty() {
        return EMPTY_LIST_MESSAGE.to_string();
    }

    let blocks: Vec<String> = projects
        .iter()
        .map(|(owner, record)| render_record(owner, record))
        .collect();
    format!("{}\n\n{}", LIST_HEADER, blocks.join("\n\n"))
}
