//! Onboarding notifier.
//!
//! Greets a new member with a direct message and announces them in the
//! welcome channel. Both sends are best-effort: failures are logged and
//! reported back to the caller, never retried.

use tracing::{info, warn};

use crate::client::SlackClient;
use crate::messages::{PostMessage, onboarding_direct_message, welcome_announcement};

/// What happened to the two onboarding messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingReport {
    /// The direct message was accepted by Slack.
    pub direct_message_sent: bool,
    /// The channel announcement was accepted by Slack.
    pub announcement_sent: bool,
}

/// Sends onboarding messages through the Web API.
#[derive(Debug, Clone)]
pub struct OnboardingNotifier {
    client: SlackClient,
}

impl OnboardingNotifier {
    /// Create a notifier on top of a Web API client.
    pub fn new(client: SlackClient) -> Self {
        Self { client }
    }

    /// Greet `user_id` privately and announce them publicly.
    pub async fn welcome(&self, user_id: &str) -> OnboardingReport {
        info!("Onboarding new member {}", user_id);

        let dm = PostMessage::new(user_id, onboarding_direct_message(user_id));
        let direct_message_sent = match self.client.post_message(&dm).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Failed to send onboarding DM to {}: {}", user_id, e);
                false
            }
        };

        let channel = self.client.config().welcome_channel();
        let announcement = PostMessage::new(channel, welcome_announcement(user_id));
        let announcement_sent = match self.client.post_message(&announcement).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Failed to announce {} in {}: {}", user_id, channel, e);
                false
            }
        };

        OnboardingReport {
            direct_message_sent,
            announcement_sent,
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::SlackConfig;

    fn notifier_for(server: &MockServer) -> OnboardingNotifier {
        let config = SlackConfig::new("xoxb-test", "secret")
            .with_api_base_url(server.uri())
            .with_welcome_channel("introductions");
        OnboardingNotifier::new(SlackClient::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_welcome_sends_dm_and_announcement() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .and(body_partial_json(serde_json::json!({"channel": "U777"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true, "ts": "1.1"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .and(body_partial_json(serde_json::json!({"channel": "introductions"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true, "ts": "1.2"})))
            .expect(1)
            .mount(&server)
            .await;

        let report = notifier_for(&server).welcome("U777").await;
        assert_eq!(
            report,
            OnboardingReport {
                direct_message_sent: true,
                announcement_sent: true,
            }
        );
    }

    #[tokio::test]
    async fn test_welcome_dm_failure_still_announces() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .and(body_partial_json(serde_json::json!({"channel": "U777"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": false, "error": "cannot_dm_bot"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .and(body_partial_json(serde_json::json!({"channel": "introductions"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true, "ts": "1.2"})))
            .expect(1)
            .mount(&server)
            .await;

        let report = notifier_for(&server).welcome("U777").await;
        assert!(!report.direct_message_sent);
        assert!(report.announcement_sent);
    }
}
