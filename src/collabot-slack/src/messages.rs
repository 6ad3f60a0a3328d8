//! Message formatting for Slack.
//!
//! Provides:
//! - Markdown to mrkdwn conversion for model answers
//! - The `/askai` success and failure replies
//! - Onboarding templates for new members

use serde::{Deserialize, Serialize};

use crate::commands::SlashCommandResponse;

/// Display name used in every message the bot writes.
pub const BOT_NAME: &str = "Collabor·AI·te";

/// Convert Markdown to Slack mrkdwn format.
///
/// - Bold: `**text**` becomes `*text*`
/// - Strikethrough: `~~text~~` becomes `~text~`
/// - Links: `[text](url)` becomes `<url|text>`
/// - Code spans and fenced blocks are left untouched
///
/// # Example
///
/// ```rust
/// use collabot_slack::messages::markdown_to_mrkdwn;
///
/// let md = "**bold** and _italic_ with a [link](https://example.com)";
/// let mrkdwn = markdown_to_mrkdwn(md);
/// assert!(mrkdwn.contains("*bold*"));
/// assert!(mrkdwn.contains("<https://example.com|link>"));
/// ```
pub fn markdown_to_mrkdwn(md: &str) -> String {
    let mut processed = String::with_capacity(md.len());
    let mut in_code_block = false;
    let mut i = 0;

    while i < md.len() {
        let remaining = &md[i..];

        if remaining.starts_with("```") {
            in_code_block = !in_code_block;
            processed.push_str("```");
            i += 3;
            continue;
        }

        if !in_code_block {
            if let Some(rest) = remaining.strip_prefix('`')
                && let Some(end) = rest.find('`')
            {
                processed.push_str(&remaining[..end + 2]);
                i += end + 2;
                continue;
            }

            if let Some(rest) = remaining.strip_prefix("**")
                && let Some(end) = rest.find("**")
            {
                processed.push('*');
                processed.push_str(&rest[..end]);
                processed.push('*');
                i += end + 4;
                continue;
            }

            if let Some(rest) = remaining.strip_prefix("~~")
                && let Some(end) = rest.find("~~")
            {
                processed.push('~');
                processed.push_str(&rest[..end]);
                processed.push('~');
                i += end + 4;
                continue;
            }

            if remaining.starts_with('[')
                && let Some(bracket_end) = remaining.find("](")
                && !remaining[1..bracket_end].contains('\n')
            {
                let text = &remaining[1..bracket_end];
                let url_start = bracket_end + 2;
                if let Some(url_end) = remaining[url_start..].find(')') {
                    let url = &remaining[url_start..url_start + url_end];
                    processed.push('<');
                    processed.push_str(url);
                    processed.push('|');
                    processed.push_str(text);
                    processed.push('>');
                    i += url_start + url_end + 1;
                    continue;
                }
            }
        }

        match remaining.chars().next() {
            Some(c) => {
                processed.push(c);
                i += c.len_utf8();
            }
            None => break,
        }
    }

    processed
}

/// Reply for a successful `/askai` answer, shown to the whole channel.
pub fn format_answer(answer: &str) -> SlashCommandResponse {
    SlashCommandResponse::text(format!(
        "🤖 *{} says:*\n{}",
        BOT_NAME,
        markdown_to_mrkdwn(answer.trim())
    ))
    .in_channel()
}

/// Reply for a failed `/askai` call, shown only to the requester.
pub fn format_error(message: &str) -> SlashCommandResponse {
    SlashCommandResponse::text(format!("⚠️ {} ran into an error: `{}`", BOT_NAME, message))
        .ephemeral()
}

/// Direct message sent to a member who just joined.
pub fn onboarding_direct_message(user_id: &str) -> String {
    format!(
        "👋 Welcome aboard, <@{user_id}>! I'm *{BOT_NAME}*, your AI/ML study buddy.\n\n\
         Here's how to get started:\n\
         • Ask me anything about AI/ML with `/askai <question>`\n\
         • Track what you're building with `/project add <description>`\n\
         • Share progress with `/project update <what changed>`\n\
         • See what everyone is working on with `/project list`\n\n\
         Helpful links:\n\
         • <https://huggingface.co/learn|Hugging Face courses>\n\
         • <https://platform.openai.com/docs|OpenAI API docs>\n\
         • <https://www.kaggle.com/learn|Kaggle Learn>"
    )
}

/// Public announcement posted when a member joins.
pub fn welcome_announcement(user_id: &str) -> String {
    format!(
        "🎉 Please welcome <@{user_id}> to the community! \
         Say hi and tell them what you're building."
    )
}

/// Body of a `chat.postMessage` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMessage {
    /// Channel ID, channel name, or user ID (for a DM).
    pub channel: String,
    /// Message text (mrkdwn).
    pub text: String,
}

impl PostMessage {
    /// Create a new message.
    pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::commands::ResponseType;

    #[test]
    fn test_markdown_to_mrkdwn_bold() {
        assert_eq!(markdown_to_mrkdwn("**bold**"), "*bold*");
        assert_eq!(markdown_to_mrkdwn("some **bold** text"), "some *bold* text");
    }

    #[test]
    fn test_markdown_to_mrkdwn_strikethrough() {
        assert_eq!(markdown_to_mrkdwn("~~strike~~"), "~strike~");
    }

    #[test]
    fn test_markdown_to_mrkdwn_links() {
        assert_eq!(
            markdown_to_mrkdwn("[click here](https://example.com)"),
            "<https://example.com|click here>"
        );
    }

    #[test]
    fn test_markdown_to_mrkdwn_code_preserved() {
        assert_eq!(
            markdown_to_mrkdwn("use `**bold**` in code"),
            "use `**bold**` in code"
        );
        assert_eq!(
            markdown_to_mrkdwn("```\n**x** [a](b)\n```"),
            "```\n**x** [a](b)\n```"
        );
    }

    #[test]
    fn test_markdown_to_mrkdwn_multibyte() {
        assert_eq!(
            markdown_to_mrkdwn("Transformers → **attention** ✨"),
            "Transformers → *attention* ✨"
        );
    }

    #[test]
    fn test_markdown_to_mrkdwn_unclosed_markers() {
        assert_eq!(markdown_to_mrkdwn("a ** b"), "a ** b");
        assert_eq!(markdown_to_mrkdwn("[not a link"), "[not a link");
    }

    #[test]
    fn test_format_answer() {
        let reply = format_answer("A **CNN** is a network.\n");
        assert_eq!(reply.response_type, Some(ResponseType::InChannel));
        assert_eq!(
            reply.text,
            "🤖 *Collabor·AI·te says:*\nA *CNN* is a network."
        );
    }

    #[test]
    fn test_format_error() {
        let reply = format_error("timed out");
        assert_eq!(reply.response_type, Some(ResponseType::Ephemeral));
        assert_eq!(reply.text, "⚠️ Collabor·AI·te ran into an error: `timed out`");
    }

    #[test]
    fn test_onboarding_templates_mention_user() {
        let dm = onboarding_direct_message("U42");
        assert!(dm.contains("<@U42>"));
        assert!(dm.contains("/askai"));
        assert!(dm.contains("/project add"));

        assert!(welcome_announcement("U42").contains("<@U42>"));
    }
}
