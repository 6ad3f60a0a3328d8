//! Application state management.

use std::sync::Arc;
use std::time::{Duration, Instant};

use collabot_llm::LlmClient;
use collabot_projects::ProjectStore;
use collabot_slack::{OnboardingNotifier, SlackClient};
use tracing::info;

use crate::config::ServerConfig;

/// Application state shared across request handlers.
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// LLM provider client for `/askai`.
    pub llm: LlmClient,
    /// Onboarding sender for `/welcome`.
    pub notifier: OnboardingNotifier,
    /// Project store for `/project`.
    pub projects: Arc<ProjectStore>,
    /// Start time.
    start_time: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("start_time", &self.start_time)
            .finish()
    }
}

impl AppState {
    /// Build the clients and store described by `config`.
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let timeout = config.upstream_timeout();
        let llm = LlmClient::new(config.llm.clone(), timeout)?;
        let slack = SlackClient::with_timeout(config.slack.clone(), timeout)?;
        let projects = Arc::new(ProjectStore::new(config.projects_file.clone()));

        info!("Project store at {:?}", projects.path());

        Ok(Self {
            config,
            llm,
            notifier: OnboardingNotifier::new(slack),
            projects,
            start_time: Instant::now(),
        })
    }

    /// Get server uptime.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}
