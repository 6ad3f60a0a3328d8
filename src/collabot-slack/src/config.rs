//! Configuration for Slack integration.
//!
//! Values are resolved through a lookup function so the same code serves
//! the process environment, a config file, or a fixed map in tests.

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::error::{SlackError, SlackResult};

/// Default Slack Web API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";

/// Default channel for new-member announcements.
pub const DEFAULT_WELCOME_CHANNEL: &str = "general";

/// Variable names understood by [`SlackConfig::from_lookup`].
pub const VAR_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";
pub const VAR_SIGNING_SECRET: &str = "SLACK_SIGNING_SECRET";
pub const VAR_VERIFY_SIGNATURES: &str = "SLACK_VERIFY_SIGNATURES";
pub const VAR_API_BASE_URL: &str = "SLACK_API_BASE_URL";
pub const VAR_WELCOME_CHANNEL: &str = "SLACK_WELCOME_CHANNEL";

/// Configuration for Slack integration.
#[derive(Clone)]
pub struct SlackConfig {
    /// Bot OAuth token (xoxb-...).
    bot_token: SecretString,
    /// Signing secret for request verification.
    signing_secret: SecretString,
    /// Whether inbound requests must carry a valid signature.
    verify_signatures: bool,
    /// Web API base URL (overridable for tests and proxies).
    api_base_url: String,
    /// Channel that receives new-member announcements.
    welcome_channel: String,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &"[REDACTED]")
            .field("signing_secret", &"[REDACTED]")
            .field("verify_signatures", &self.verify_signatures)
            .field("api_base_url", &self.api_base_url)
            .field("welcome_channel", &self.welcome_channel)
            .finish()
    }
}

impl SlackConfig {
    /// Create a new configuration with the two Slack secrets.
    ///
    /// Signature verification is on by default.
    pub fn new(bot_token: impl Into<String>, signing_secret: impl Into<String>) -> Self {
        Self {
            bot_token: SecretString::new(bot_token.into().into()),
            signing_secret: SecretString::new(signing_secret.into().into()),
            verify_signatures: true,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            welcome_channel: DEFAULT_WELCOME_CHANNEL.to_string(),
        }
    }

    /// Enable or disable inbound signature verification.
    pub fn with_verify_signatures(mut self, verify: bool) -> Self {
        self.verify_signatures = verify;
        self
    }

    /// Override the Web API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the announcement channel.
    pub fn with_welcome_channel(mut self, channel: impl Into<String>) -> Self {
        self.welcome_channel = channel.into();
        self
    }

    /// Build configuration from a variable lookup.
    ///
    /// Recognized variables:
    /// - `SLACK_BOT_TOKEN`
    /// - `SLACK_SIGNING_SECRET`
    /// - `SLACK_VERIFY_SIGNATURES` (default `true`)
    /// - `SLACK_API_BASE_URL` (default `https://slack.com/api`)
    /// - `SLACK_WELCOME_CHANNEL` (default `general`)
    pub fn from_lookup<F>(lookup: F) -> SlackResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup(VAR_BOT_TOKEN).unwrap_or_default();
        let signing_secret = lookup(VAR_SIGNING_SECRET).unwrap_or_default();

        if bot_token.is_empty() {
            warn!("{} not set, onboarding messages will be rejected by Slack", VAR_BOT_TOKEN);
        } else if !bot_token.starts_with("xoxb-") {
            warn!("Bot token doesn't start with 'xoxb-', this may be incorrect");
        }

        let verify_signatures = match lookup(VAR_VERIFY_SIGNATURES) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                SlackError::Config(format!("{} must be true or false, got '{}'", VAR_VERIFY_SIGNATURES, raw))
            })?,
            None => true,
        };

        let mut config = Self::new(bot_token, signing_secret).with_verify_signatures(verify_signatures);

        if let Some(url) = lookup(VAR_API_BASE_URL).filter(|u| !u.is_empty()) {
            config = config.with_api_base_url(url);
        }
        if let Some(channel) = lookup(VAR_WELCOME_CHANNEL).filter(|c| !c.is_empty()) {
            config = config.with_welcome_channel(channel);
        }

        Ok(config)
    }

    /// Get the bot token.
    pub fn bot_token(&self) -> &str {
        self.bot_token.expose_secret()
    }

    /// Get the signing secret.
    pub fn signing_secret(&self) -> &str {
        self.signing_secret.expose_secret()
    }

    /// Whether inbound requests must be signed.
    pub fn verify_signatures(&self) -> bool {
        self.verify_signatures
    }

    /// Web API base URL without a trailing slash.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Channel receiving new-member announcements.
    pub fn welcome_channel(&self) -> &str {
        &self.welcome_channel
    }

    /// Validate the configuration.
    pub fn validate(&self) -> SlackResult<()> {
        if self.verify_signatures && self.signing_secret.expose_secret().is_empty() {
            return Err(SlackError::Config(format!(
                "{} is required while signature verification is enabled",
                VAR_SIGNING_SECRET
            )));
        }
        if self.welcome_channel.trim().is_empty() {
            return Err(SlackError::Config("Welcome channel is empty".to_string()));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(SlackError::Config(format!(
                "Slack API base URL must be http(s): {}",
                self.api_base_url
            )));
        }
        Ok(())
    }
}

/// Parse a boolean flag the way operators tend to write them.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
