//! Events API payloads used by the onboarding flow.
//!
//! Handles:
//! - `url_verification` - the handshake Slack performs when the request URL
//!   is registered
//! - `team_join` - `event.user` is a full user object
//! - `member_joined_channel` - `event.user` is a bare user ID

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SlackError, SlackResult};

/// Outer Events API envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Envelope type (`url_verification`, `event_callback`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub envelope_type: Option<String>,
    /// Handshake challenge (url_verification only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    /// Team ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Event ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// The inner event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<serde_json::Value>,
}

/// A parsed inbound event envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Request URL handshake; echo the challenge back.
    UrlVerification {
        /// Challenge string to echo.
        challenge: String,
    },
    /// A new member to greet.
    Welcome(WelcomeEvent),
}

/// A "member joined" style event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeEvent {
    /// The joining user's ID.
    pub user_id: String,
    /// Inner event type, if Slack sent one.
    pub event_type: Option<String>,
}

impl EventEnvelope {
    /// Classify the envelope.
    ///
    /// Fails with [`SlackError::InvalidPayload`] when a non-handshake
    /// envelope carries no usable user ID.
    pub fn parse(&self) -> SlackResult<InboundEvent> {
        if self.envelope_type.as_deref() == Some("url_verification") {
            let challenge = self
                .challenge
                .clone()
                .ok_or_else(|| SlackError::InvalidPayload("Missing challenge".to_string()))?;
            return Ok(InboundEvent::UrlVerification { challenge });
        }

        let event = self
            .event
            .as_ref()
            .ok_or_else(|| SlackError::InvalidPayload("Missing event field".to_string()))?;

        let event_type = event
            .get("type")
            .and_then(|t| t.as_str())
            .map(str::to_string);
        debug!("Parsing welcome event of type {:?}", event_type);

        let user_id = extract_user_id(event)
            .ok_or_else(|| SlackError::InvalidPayload("Missing user ID".to_string()))?;

        Ok(InboundEvent::Welcome(WelcomeEvent {
            user_id,
            event_type,
        }))
    }
}

/// Pull the user ID out of `event.user`, which is either an object with an
/// `id` or a bare ID string.
pub fn extract_user_id(event: &serde_json::Value) -> Option<String> {
    let user = event.get("user")?;
    let id = match user {
        serde_json::Value::String(id) => id.as_str(),
        serde_json::Value::Object(fields) => fields.get("id")?.as_str()?,
        _ => return None,
    };
    let id = id.trim();
    (!id.is_empty()).then(|| id.to_string())
}
