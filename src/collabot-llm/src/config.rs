//! Provider configuration.

use secrecy::{ExposeSecret, SecretString};

use crate::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE, LlmError, Result, SYSTEM_PROMPT};

/// Request/response shape spoken by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiFormat {
    /// OpenAI-compatible `POST /chat/completions`.
    #[default]
    ChatCompletions,
    /// Simple `POST /query` with `{query}` in and `{response}` out.
    Query,
}

impl ApiFormat {
    /// Path appended to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::ChatCompletions => "chat/completions",
            Self::Query => "query",
        }
    }
}

impl std::str::FromStr for ApiFormat {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chat_completions" | "chat-completions" | "openai" => Ok(Self::ChatCompletions),
            "query" => Ok(Self::Query),
            other => Err(LlmError::Config(format!("unknown API format '{}'", other))),
        }
    }
}

/// Provider connection settings.
#[derive(Clone)]
pub struct LlmConfig {
    api_key: SecretString,
    base_url: String,
    model: String,
    temperature: f64,
    format: ApiFormat,
    system_prompt: String,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("format", &self.format)
            .finish()
    }
}

impl LlmConfig {
    /// Create a config for the default provider and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into().into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            format: ApiFormat::default(),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Set the provider base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the request/response format.
    pub fn with_format(mut self, format: ApiFormat) -> Self {
        self.format = format;
        self
    }

    /// Build from a variable lookup.
    ///
    /// Recognized variables: `OPENAI_API_KEY` (or `LLM_API_KEY`),
    /// `LLM_BASE_URL`, `LLM_MODEL`, `LLM_TEMPERATURE`, `LLM_API_FORMAT`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.is_empty())
            .or_else(|| lookup("LLM_API_KEY"))
            .unwrap_or_default();

        let mut config = Self::new(api_key);

        if let Some(url) = lookup("LLM_BASE_URL").filter(|u| !u.is_empty()) {
            config = config.with_base_url(url);
        }
        if let Some(model) = lookup("LLM_MODEL").filter(|m| !m.is_empty()) {
            config = config.with_model(model);
        }
        if let Some(raw) = lookup("LLM_TEMPERATURE").filter(|t| !t.is_empty()) {
            let temperature = raw.trim().parse::<f64>().map_err(|_| {
                LlmError::Config(format!("LLM_TEMPERATURE must be a number, got '{}'", raw))
            })?;
            config = config.with_temperature(temperature);
        }
        if let Some(raw) = lookup("LLM_API_FORMAT").filter(|f| !f.is_empty()) {
            config = config.with_format(raw.parse()?);
        }

        Ok(config)
    }

    /// Check the values are usable.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(LlmError::Config(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::Config("model is empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(LlmError::Config(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        Ok(())
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn format(&self) -> ApiFormat {
        self.format
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, self.format.path())
    }
}
