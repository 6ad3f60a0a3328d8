//! Request and response shapes for provider APIs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat message for completions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author (system, user, assistant)
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model to use for completion
    pub model: String,
    /// Messages in the conversation
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f64,
}

impl ChatRequest {
    /// Build the two-message conversation: persona, then the question.
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        question: impl Into<String>,
        temperature: f64,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(question),
            ],
            temperature,
        }
    }
}

/// Request body for simple query-style providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's question
    pub query: String,
}

/// Outcome of decoding a 2xx provider body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReply {
    /// The canonical answer text.
    Parsed(String),
    /// The body did not have the expected shape.
    Malformed(String),
}

/// Extract the answer from a chat-completion style body.
///
/// Looks for `choices[0].message.content`. Content given as an array of
/// parts (`[{"type": "text", "text": ...}]`) is joined, and a legacy
/// `choices[0].text` is accepted as well.
pub fn parse_chat_completion(body: &Value) -> ParsedReply {
    let Some(choices) = body.get("choices") else {
        return ParsedReply::Malformed(describe_missing_choices(body));
    };
    let Some(choices) = choices.as_array() else {
        return ParsedReply::Malformed("`choices` is not an array".to_string());
    };
    let Some(first) = choices.first() else {
        return ParsedReply::Malformed("`choices` is empty".to_string());
    };
    if !first.is_object() {
        return ParsedReply::Malformed("first choice is not an object".to_string());
    }

    let content = first
        .get("message")
        .and_then(|message| message.get("content"))
        .or_else(|| first.get("text"));

    match content {
        Some(Value::String(text)) => ParsedReply::Parsed(text.clone()),
        Some(Value::Array(parts)) => {
            let text: Vec<&str> = parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect();
            if text.is_empty() {
                ParsedReply::Malformed("first choice has no text content".to_string())
            } else {
                ParsedReply::Parsed(text.concat())
            }
        }
        Some(Value::Null) | None => {
            ParsedReply::Malformed("first choice has no message content".to_string())
        }
        Some(_) => ParsedReply::Malformed("message content is not text".to_string()),
    }
}

/// Answer for a query-style body that carries no `response`.
pub const QUERY_FALLBACK_ANSWER: &str = "Sorry, I didn't get that.";

/// Extract the answer from a query-style body (`{"response": ...}`).
///
/// An absent or null `response` is not an error; it yields
/// [`QUERY_FALLBACK_ANSWER`].
pub fn parse_query_response(body: &Value) -> ParsedReply {
    if body.get("error").is_some_and(|e| !e.is_null()) {
        return ParsedReply::Malformed("Sorry, something went wrong!".to_string());
    }
    match body.get("response") {
        Some(Value::String(text)) => ParsedReply::Parsed(text.clone()),
        Some(Value::Null) | None => ParsedReply::Parsed(QUERY_FALLBACK_ANSWER.to_string()),
        Some(_) => ParsedReply::Malformed("`response` is not text".to_string()),
    }
}

fn describe_missing_choices(body: &Value) -> String {
    // Providers often answer 200 with an `error` object instead of choices
    match body
        .get("error")
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(Value::as_str)
    {
        Some(message) => format!("missing `choices` field, provider said: {}", message),
        None => "missing `choices` field".to_string(),
    }
}

/// Pull a human-readable message out of an error body, if any.
pub(crate) fn provider_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return String::new();
    };
    value
        .get("error")
        .and_then(|e| e.get("message").and_then(Value::as_str).or_else(|| e.as_str()))
        .unwrap_or_default()
        .to_string()
}
