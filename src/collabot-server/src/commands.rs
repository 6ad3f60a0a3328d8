//! `/project` command parsing and reply text.

use collabot_projects::ProjectRecord;
use collabot_slack::SlashCommandResponse;

/// Usage help, sent for anything that does not parse.
pub const PROJECT_USAGE: &str = "Usage:\n\
    • `/project add <description>` - start tracking your project\n\
    • `/project update <what changed>` - log progress on it\n\
    • `/project list` - see what everyone is building";

/// Reply for `update` before any `add`.
pub const PROJECT_NOT_FOUND: &str = "❌ No project found. Use `/project add <description>` first.";

/// A parsed `/project` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectCommand {
    Add(String),
    Update(String),
    List,
}

impl ProjectCommand {
    /// Split `text` on its first whitespace into action and remainder.
    ///
    /// Actions are case-insensitive. `add` and `update` need a non-empty
    /// remainder; `list` ignores it.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (action, rest) = match text.split_once(char::is_whitespace) {
            Some((action, rest)) => (action, rest.trim()),
            None => (text, ""),
        };

        match action.to_lowercase().as_str() {
            "add" if !rest.is_empty() => Some(Self::Add(rest.to_string())),
            "update" if !rest.is_empty() => Some(Self::Update(rest.to_string())),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

pub fn usage_reply() -> SlashCommandResponse {
    SlashCommandResponse::text(PROJECT_USAGE).ephemeral()
}

pub fn not_found_reply() -> SlashCommandResponse {
    SlashCommandResponse::text(PROJECT_NOT_FOUND).ephemeral()
}

pub fn added_reply(user_id: &str, record: &ProjectRecord) -> SlashCommandResponse {
    let mut text = format!(
        "✅ Project saved for <@{}>\n*Project:* {}",
        user_id, record.description
    );
    push_tags(&mut text, &record.tags);
    SlashCommandResponse::text(text).in_channel()
}

pub fn updated_reply(user_id: &str, update: &str, record: &ProjectRecord) -> SlashCommandResponse {
    let mut text = format!("📝 Update added for <@{}>\n• {}", user_id, update);
    push_tags(&mut text, &record.tags);
    SlashCommandResponse::text(text).in_channel()
}

/// Reply when the store could not be read or written.
pub fn storage_error_reply(detail: &str) -> SlashCommandResponse {
    SlashCommandResponse::text(format!("⚠️ Could not reach the project tracker: `{}`", detail))
        .ephemeral()
}

fn push_tags(text: &mut String, tags: &[String]) {
    if !tags.is_empty() {
        text.push_str("\nTags: ");
        text.push_str(&tags.join(" "));
    }
}
