//! Minimal Slack Web API client.
//!
//! Only `chat.postMessage` is needed by the service. Calls are made once;
//! there is no retry policy.

use std::time::Duration;

use tracing::debug;

use crate::config::SlackConfig;
use crate::error::{SlackApiError, SlackError, SlackResult};
use crate::messages::PostMessage;

/// Default timeout for Web API calls.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Slack Web API.
#[derive(Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    config: SlackConfig,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("config", &self.config)
            .finish()
    }
}

impl SlackClient {
    /// Create a client with the default timeout.
    pub fn new(config: SlackConfig) -> SlackResult<Self> {
        Self::with_timeout(config, DEFAULT_API_TIMEOUT)
    }

    /// Create a client whose calls give up after `timeout`.
    pub fn with_timeout(config: SlackConfig, timeout: Duration) -> SlackResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5).min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| SlackError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &SlackConfig {
        &self.config
    }

    /// Post a message to a channel (or a user ID, which opens a DM).
    ///
    /// Returns the message timestamp Slack assigned.
    pub async fn post_message(&self, message: &PostMessage) -> SlackResult<String> {
        debug!("Posting message to {}", message.channel);

        let response: serde_json::Value = self.api_call("chat.postMessage", message).await?;

        if response.get("ok").and_then(|v| v.as_bool()) != Some(true) {
            let error = response
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("unknown");
            return Err(SlackApiError::new(error, error).into());
        }

        response
            .get("ts")
            .and_then(|ts| ts.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| SlackError::Api("Missing ts in response".to_string()))
    }

    /// Make an API call to Slack.
    async fn api_call<B, T>(&self, method: &str, payload: &B) -> SlackResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", self.config.api_base_url(), method);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.bot_token()),
            )
            .header("Content-Type", "application/json; charset=utf-8")
            .json(payload)
            .send()
            .await?;

        if response.status() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(30);
            return Err(SlackError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::Api(format!("{}: {}", status, body)));
        }

        let result: T = response.json().await?;
        Ok(result)
    }
}
