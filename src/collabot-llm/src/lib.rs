//! Chat-completion gateway for Collabot.
//!
//! Turns a question into a provider request (fixed persona prompt plus the
//! user's text), sends it once, and extracts the answer from whatever JSON
//! comes back. Every failure is classified so callers can show a readable
//! message instead of crashing.

mod client;
mod config;
mod models;

pub use client::LlmClient;
pub use config::{ApiFormat, LlmConfig};
pub use models::{
    ChatMessage, ChatRequest, ParsedReply, QUERY_FALLBACK_ANSWER, QueryRequest,
    parse_chat_completion, parse_query_response,
};

/// Default provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Persona prompt sent as the system message of every conversation.
pub const SYSTEM_PROMPT: &str = "You are Collabor·AI·te, a friendly, smart AI Slack assistant that answers AI/ML questions clearly and with encouragement.";

/// Broad classification of a gateway failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a usable HTTP exchange, or the provider
    /// answered with a non-2xx status.
    UpstreamTransport,
    /// The provider answered 2xx but the body is not the expected shape.
    UpstreamShape,
    /// The gateway itself is misconfigured.
    Config,
}

/// Error types for gateway operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Request to provider failed: {0}")]
    Transport(String),

    #[error("Provider did not answer within the timeout")]
    Timeout,

    #[error("Provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Provider returned invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Unexpected provider response: {0}")]
    Shape(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Classification used by the dispatcher and in logs.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Timeout | Self::Status { .. } => ErrorKind::UpstreamTransport,
            Self::InvalidJson(_) | Self::Shape(_) => ErrorKind::UpstreamShape,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Short diagnostic suitable for showing to a Slack user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "could not reach the AI provider".to_string(),
            Self::Timeout => "the AI provider took too long to answer".to_string(),
            Self::Status { status, message } if message.is_empty() => {
                format!("the AI provider returned HTTP {}", status)
            }
            Self::Status { status, message } => {
                format!("the AI provider returned HTTP {}: {}", status, message)
            }
            Self::InvalidJson(_) => "the AI provider sent an unreadable response".to_string(),
            Self::Shape(reason) => format!("the AI provider sent an unexpected response ({})", reason),
            Self::Config(reason) => format!("the AI gateway is misconfigured ({})", reason),
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidJson(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, LlmError>;
