//! Slack integration for Collabot.
//!
//! This crate covers the Slack side of the service:
//! - Request signature verification (`v0` HMAC-SHA256 scheme)
//! - Slash command payloads and replies (`in_channel` / `ephemeral`)
//! - Events API payloads for the onboarding flow
//! - A small Web API client for `chat.postMessage`
//! - The onboarding notifier that greets new members
//!
//! # Configuration
//!
//! `SlackConfig` is built once at startup (see [`SlackConfig::from_lookup`])
//! and handed to the components that need it. Nothing in this crate reads
//! the process environment on its own.

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod messages;
pub mod notifier;
pub mod signature;

pub use client::SlackClient;
pub use commands::{ResponseType, SlashCommandPayload, SlashCommandResponse};
pub use config::SlackConfig;
pub use error::{SlackError, SlackResult};
pub use events::{EventEnvelope, WelcomeEvent};
pub use notifier::{OnboardingNotifier, OnboardingReport};
pub use signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER, compute_signature, verify_signature};
