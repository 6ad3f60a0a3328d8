//! `/askai` slash command.

use std::sync::Arc;

use axum::{Form, Json, extract::State, extract::rejection::FormRejection};
use collabot_slack::messages::{format_answer, format_error};
use collabot_slack::{SlashCommandPayload, SlashCommandResponse};
use tracing::{info, warn};

use crate::state::AppState;

/// Forward the command text to the LLM and relay its answer.
///
/// Always answers 200: the answer goes to the channel, any failure only
/// to the requester.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Form<SlashCommandPayload>, FormRejection>,
) -> Json<SlashCommandResponse> {
    let Form(payload) = match payload {
        Ok(form) => form,
        Err(rejection) => {
            warn!("Unreadable /askai payload: {}", rejection);
            return Json(format_error("could not read the slash command payload"));
        }
    };

    info!(user = payload.user().unwrap_or("-"), "Answering /askai");

    match state.llm.ask(&payload.text).await {
        Ok(answer) => Json(format_answer(&answer)),
        Err(e) => {
            warn!(kind = ?e.kind(), "LLM request failed: {}", e);
            Json(format_error(&e.user_message()))
        }
    }
}
