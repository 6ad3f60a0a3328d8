//! Gateway client implementation

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ApiFormat, LlmConfig};
use crate::models::{
    ChatRequest, ParsedReply, QueryRequest, parse_chat_completion, parse_query_response,
    provider_error_message,
};
use crate::{LlmError, Result};

/// Client for a chat-completion provider
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("config", &self.config)
            .finish()
    }
}

impl LlmClient {
    /// Create a client whose requests give up after `timeout`
    pub fn new(config: LlmConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5).min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Build the JSON body for `question` in the configured format
    pub fn request_body(&self, question: &str) -> Result<Value> {
        let body = match self.config.format() {
            ApiFormat::ChatCompletions => serde_json::to_value(ChatRequest::new(
                self.config.model(),
                self.config.system_prompt(),
                question,
                self.config.temperature(),
            )),
            ApiFormat::Query => serde_json::to_value(QueryRequest {
                query: question.to_string(),
            }),
        };
        body.map_err(|e| LlmError::Config(format!("failed to encode request: {}", e)))
    }

    /// Ask a single question and return the provider's answer.
    ///
    /// One attempt only. Transport failures, non-2xx statuses, unreadable
    /// bodies and unexpected shapes all come back as [`LlmError`].
    pub async fn ask(&self, question: &str) -> Result<String> {
        if !self.config.has_api_key() {
            return Err(LlmError::Config("no provider API key configured".to_string()));
        }

        let url = self.config.endpoint();
        let body = self.request_body(question)?;
        debug!(model = %self.config.model(), "Sending question to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Provider answered {}: {}", status, truncate(&text, 200));
            return Err(LlmError::Status {
                status: status.as_u16(),
                message: provider_error_message(&text),
            });
        }

        let value: Value =
            serde_json::from_str(&text).map_err(|e| LlmError::InvalidJson(e.to_string()))?;

        let parsed = match self.config.format() {
            ApiFormat::ChatCompletions => parse_chat_completion(&value),
            ApiFormat::Query => parse_query_response(&value),
        };

        match parsed {
            ParsedReply::Parsed(answer) => Ok(answer),
            ParsedReply::Malformed(reason) => {
                warn!("Provider response had unexpected shape: {}", reason);
                Err(LlmError::Shape(reason))
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::SYSTEM_PROMPT;

    fn client_for(server: &MockServer) -> LlmClient {
        let config = LlmConfig::new("sk-test").with_base_url(server.uri());
        LlmClient::new(config, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_ask_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": "What is overfitting?"}
                ],
                "temperature": 0.7
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-123",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "When a model memorizes noise."},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client_for(&server).ask("What is overfitting?").await.expect("answer");
        assert_eq!(answer, "When a model memorizes noise.");
    }

    #[tokio::test]
    async fn test_ask_missing_choices_is_shape_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "x"})))
            .mount(&server)
            .await;

        let err = client_for(&server).ask("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::Shape(_)));
        assert_eq!(err.kind(), crate::ErrorKind::UpstreamShape);
    }

    #[tokio::test]
    async fn test_ask_empty_choices_is_shape_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).ask("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::Shape(reason) if reason.contains("empty")));
    }

    #[tokio::test]
    async fn test_ask_invalid_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let err = client_for(&server).ask("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_ask_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).ask("hi").await.unwrap_err();
        match err {
            LlmError::Status { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("Expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ask_unparseable_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).ask("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::Status { status: 502, ref message } if message.is_empty()));
        assert_eq!(err.kind(), crate::ErrorKind::UpstreamTransport);
    }

    #[tokio::test]
    async fn test_ask_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"choices": [{"message": {"content": "late"}}]}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = LlmConfig::new("sk-test").with_base_url(server.uri());
        let client = LlmClient::new(config, Duration::from_millis(200)).unwrap();

        let err = client.ask("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout));
    }

    #[tokio::test]
    async fn test_ask_connection_refused() {
        let config = LlmConfig::new("sk-test").with_base_url("http://127.0.0.1:1");
        let client = LlmClient::new(config, Duration::from_secs(2)).unwrap();

        let err = client.ask("hi").await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::UpstreamTransport);
    }

    #[tokio::test]
    async fn test_ask_query_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_json(serde_json::json!({"query": "What is RAG?"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response": "Retrieval augmented generation."})),
            )
            .mount(&server)
            .await;

        let config = LlmConfig::new("gsk-test")
            .with_base_url(server.uri())
            .with_format(ApiFormat::Query);
        let client = LlmClient::new(config, Duration::from_secs(5)).unwrap();

        let answer = client.ask("What is RAG?").await.expect("answer");
        assert_eq!(answer, "Retrieval augmented generation.");
    }

    #[tokio::test]
    async fn test_ask_query_format_without_response_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"sources": []})))
            .mount(&server)
            .await;

        let config = LlmConfig::new("gsk-test")
            .with_base_url(server.uri())
            .with_format(ApiFormat::Query);
        let client = LlmClient::new(config, Duration::from_secs(5)).unwrap();

        let answer = client.ask("What is RAG?").await.expect("answer");
        assert_eq!(answer, crate::QUERY_FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_ask_without_key() {
        let client = LlmClient::new(LlmConfig::new(""), Duration::from_secs(1)).unwrap();
        let err = client.ask("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn test_request_body_accepts_empty_question() {
        let client = LlmClient::new(LlmConfig::new("k"), Duration::from_secs(1)).unwrap();
        let body = client.request_body("").unwrap();
        assert_eq!(body["messages"][1]["content"], "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
