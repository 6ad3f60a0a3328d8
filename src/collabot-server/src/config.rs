//! Server configuration.
//!
//! Built once at startup and shared read-only through [`AppState`]. The
//! server settings deserialize from an optional JSON file; environment
//! variables are applied on top, so no handler ever reads the environment.
//!
//! [`AppState`]: crate::state::AppState

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use collabot_llm::LlmConfig;
use collabot_slack::SlackConfig;
use serde::Deserialize;
use tracing::warn;

pub const VAR_LISTEN_ADDR: &str = "COLLABOT_LISTEN_ADDR";
pub const VAR_UPSTREAM_TIMEOUT: &str = "COLLABOT_UPSTREAM_TIMEOUT_SECS";
pub const VAR_PROJECTS_FILE: &str = "COLLABOT_PROJECTS_FILE";
pub const VAR_MAX_BODY_SIZE: &str = "COLLABOT_MAX_BODY_SIZE";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Timeout in seconds for calls to the LLM provider and Slack.
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,

    /// Location of the project store file.
    #[serde(default = "default_projects_file")]
    pub projects_file: PathBuf,

    /// Slack credentials and behavior.
    #[serde(skip, default = "default_slack")]
    pub slack: SlackConfig,

    /// LLM provider settings.
    #[serde(skip, default = "default_llm")]
    pub llm: LlmConfig,

    /// `SLACK_*` / `LLM_*` values from the file. Consumed while loading.
    #[serde(default)]
    variables: HashMap<String, String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

fn default_upstream_timeout() -> u64 {
    30
}

fn default_projects_file() -> PathBuf {
    PathBuf::from("projects.json")
}

fn default_slack() -> SlackConfig {
    SlackConfig::new("", "")
}

fn default_llm() -> LlmConfig {
    LlmConfig::new("")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            max_body_size: default_max_body_size(),
            upstream_timeout_secs: default_upstream_timeout(),
            projects_file: default_projects_file(),
            slack: default_slack(),
            llm: default_llm(),
            variables: HashMap::new(),
        }
    }
}

impl ServerConfig {
    /// Load from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from file, with the environment taking
    /// precedence over anything the file sets.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::load`] with an explicit override lookup.
    pub fn load_with<F>(path: impl AsRef<Path>, overrides: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        let variables = std::mem::take(&mut config.variables);
        config.apply_overrides(|key| overrides(key).or_else(|| variables.get(key).cloned()))?;
        Ok(config)
    }

    /// Build from a variable lookup alone.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.slack = SlackConfig::from_lookup(&lookup)?;
        self.llm = LlmConfig::from_lookup(&lookup)?;

        if let Some(addr) = lookup(VAR_LISTEN_ADDR).filter(|a| !a.is_empty()) {
            self.listen_addr = addr;
        }
        if let Some(raw) = lookup(VAR_UPSTREAM_TIMEOUT).filter(|t| !t.is_empty()) {
            self.upstream_timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", VAR_UPSTREAM_TIMEOUT))?;
        }
        if let Some(raw) = lookup(VAR_MAX_BODY_SIZE).filter(|s| !s.is_empty()) {
            self.max_body_size = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of bytes", VAR_MAX_BODY_SIZE))?;
        }
        if let Some(file) = lookup(VAR_PROJECTS_FILE).filter(|f| !f.is_empty()) {
            self.projects_file = PathBuf::from(file);
        }

        if !self.llm.has_api_key() {
            warn!("No LLM API key configured, /askai will answer with an error");
        }

        Ok(())
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid listen address '{}'", self.listen_addr))?;
        if self.upstream_timeout_secs == 0 {
            bail!("{} must be greater than zero", VAR_UPSTREAM_TIMEOUT);
        }
        if self.max_body_size == 0 {
            bail!("{} must be greater than zero", VAR_MAX_BODY_SIZE);
        }
        self.slack.validate()?;
        self.llm.validate()?;
        Ok(())
    }

    /// Get the upstream timeout as Duration.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
