//! `/project` slash command.

use std::sync::Arc;

use axum::{Form, Json, extract::State, extract::rejection::FormRejection};
use collabot_projects::{ProjectError, ProjectStore, render_list};
use collabot_slack::{SlashCommandPayload, SlashCommandResponse};
use tracing::{error, info, warn};

use crate::commands::{
    ProjectCommand, added_reply, not_found_reply, storage_error_reply, updated_reply, usage_reply,
};
use crate::state::AppState;

/// Run `add`, `update` or `list` against the project store.
pub async fn project(
    State(state): State<Arc<AppState>>,
    payload: Result<Form<SlashCommandPayload>, FormRejection>,
) -> Json<SlashCommandResponse> {
    let Form(payload) = match payload {
        Ok(form) => form,
        Err(rejection) => {
            warn!("Unreadable /project payload: {}", rejection);
            return Json(usage_reply());
        }
    };

    let Some(command) = ProjectCommand::parse(&payload.text) else {
        return Json(usage_reply());
    };

    let store = Arc::clone(&state.projects);
    let reply = match command {
        ProjectCommand::List => match with_store(store, |s| s.list()).await {
            Ok(projects) => SlashCommandResponse::text(render_list(&projects)),
            Err(e) => failure_reply(e),
        },
        ProjectCommand::Add(description) => {
            let Some(user) = payload.user().map(str::to_string) else {
                return Json(missing_user_reply());
            };
            info!(user = %user, "Saving project");
            let owner = user.clone();
            match with_store(store, move |s| s.add(&owner, &description)).await {
                Ok(record) => added_reply(&user, &record),
                Err(e) => failure_reply(e),
            }
        }
        ProjectCommand::Update(text) => {
            let Some(user) = payload.user().map(str::to_string) else {
                return Json(missing_user_reply());
            };
            info!(user = %user, "Adding project update");
            let owner = user.clone();
            let update = text.clone();
            match with_store(store, move |s| s.update(&owner, &update)).await {
                Ok(record) => updated_reply(&user, &text, &record),
                Err(e) => failure_reply(e),
            }
        }
    };

    Json(reply)
}

enum StoreFailure {
    Project(ProjectError),
    Task(tokio::task::JoinError),
}

/// Run a blocking store operation off the async workers.
async fn with_store<T, F>(store: Arc<ProjectStore>, op: F) -> Result<T, StoreFailure>
where
    T: Send + 'static,
    F: FnOnce(&ProjectStore) -> Result<T, ProjectError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(StoreFailure::Task)?
        .map_err(StoreFailure::Project)
}

fn failure_reply(failure: StoreFailure) -> SlashCommandResponse {
    match failure {
        StoreFailure::Project(e) if e.is_not_found() => not_found_reply(),
        StoreFailure::Project(e) => {
            error!("Project store failure: {}", e);
            storage_error_reply(&e.to_string())
        }
        StoreFailure::Task(e) => {
            error!("Project store task failed: {}", e);
            storage_error_reply("internal error")
        }
    }
}

fn missing_user_reply() -> SlashCommandResponse {
    SlashCommandResponse::text("⚠️ Slack did not say who sent this command.").ephemeral()
}
