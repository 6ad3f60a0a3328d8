//! `/welcome` Events API endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use collabot_slack::{EventEnvelope, SlackError};
use collabot_slack::events::InboundEvent;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Greet a new member, or answer the URL verification handshake.
///
/// The onboarding sends run on a spawned task so the event is acknowledged
/// with `OK` right away; Slack retries events it does not see answered
/// within a few seconds. The sends are best-effort.
pub async fn welcome(State(state): State<Arc<AppState>>, body: Bytes) -> AppResult<Response> {
    let envelope: EventEnvelope = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    let event = envelope.parse().map_err(|e| {
        warn!("Rejected welcome event: {}", e);
        match e {
            SlackError::InvalidPayload(reason) => AppError::BadRequest(reason),
            other => AppError::BadRequest(other.to_string()),
        }
    })?;

    match event {
        InboundEvent::UrlVerification { challenge } => {
            debug!("Answering url_verification handshake");
            Ok(challenge.into_response())
        }
        InboundEvent::Welcome(event) => {
            let notifier = state.notifier.clone();
            tokio::spawn(async move {
                let report = notifier.welcome(&event.user_id).await;
                debug!(
                    user = %event.user_id,
                    event_type = ?event.event_type,
                    dm = report.direct_message_sent,
                    announcement = report.announcement_sent,
                    "Onboarding finished"
                );
            });
            Ok("OK".into_response())
        }
    }
}
