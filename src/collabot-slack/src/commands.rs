//! Slack slash command payloads and replies.
//!
//! Slash commands arrive as `application/x-www-form-urlencoded` POSTs. The
//! service answers synchronously with a JSON body that Slack renders either
//! to the whole channel or only to the invoking user.

use serde::{Deserialize, Serialize};

/// Slack slash command payload.
///
/// Every field is optional on the wire; absent fields decode as empty
/// strings so handlers never have to special-case a missing `text`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlashCommandPayload {
    /// Verification token (deprecated in favor of request signing).
    pub token: String,
    /// Team ID.
    pub team_id: String,
    /// Team domain.
    pub team_domain: String,
    /// Channel ID where the command was invoked.
    pub channel_id: String,
    /// Channel name.
    pub channel_name: String,
    /// User ID who invoked the command.
    pub user_id: String,
    /// Username.
    pub user_name: String,
    /// The command (e.g., "/askai").
    pub command: String,
    /// Text after the command.
    pub text: String,
    /// URL for delayed responses.
    pub response_url: String,
    /// Trigger ID for opening modals.
    pub trigger_id: String,
}

impl SlashCommandPayload {
    /// The invoking user, if Slack sent one.
    pub fn user(&self) -> Option<&str> {
        let user = self.user_id.trim();
        (!user.is_empty()).then_some(user)
    }
}

/// Response type for slash command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Only visible to the user who invoked the command.
    #[default]
    Ephemeral,
    /// Visible to everyone in the channel.
    InChannel,
}

/// Immediate response to a slash command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlashCommandResponse {
    /// Response type; Slack treats an absent value as ephemeral.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    /// Message text (mrkdwn).
    pub text: String,
}

impl SlashCommandResponse {
    /// Create a text response without an explicit response type.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            response_type: None,
            text: text.into(),
        }
    }

    /// Set response type to ephemeral (only visible to invoker).
    pub fn ephemeral(mut self) -> Self {
        self.response_type = Some(ResponseType::Ephemeral);
        self
    }

    /// Set response type to in_channel (visible to all).
    pub fn in_channel(mut self) -> Self {
        self.response_type = Some(ResponseType::InChannel);
        self
    }

    /// Whether the reply is shown to the whole channel.
    pub fn is_in_channel(&self) -> bool {
        self.response_type == Some(ResponseType::InChannel)
    }
}
