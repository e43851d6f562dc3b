use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use tracing::info;

use crate::api::handlers::{attendance, report_error};
use crate::api::payload::EventCallback;
use crate::api::views;
use crate::domain::models::event::EventFilter;
use crate::error::AppError;
use crate::state::AppState;

/// Events API endpoint: answers the URL handshake and reacts to the home
/// tab being opened.
pub async fn handle_event_callback(
    State(state): State<Arc<AppState>>,
    Json(callback): Json<EventCallback>,
) -> Result<Response, AppError> {
    match callback {
        EventCallback::UrlVerification { challenge } => {
            Ok(Json(json!({ "challenge": challenge })).into_response())
        }
        EventCallback::EventCallback { event } => {
            if event.kind == "app_home_opened" && event.tab.as_deref() == Some("home") {
                if let Some(user_id) = event.user {
                    if let Err(err) = home_opened(&state, &user_id).await {
                        report_error(&state, &user_id, &err).await;
                    }
                }
            }
            Ok(StatusCode::OK.into_response())
        }
    }
}

async fn home_opened(state: &AppState, user_id: &str) -> Result<(), AppError> {
    info!("Home opened by {}", user_id);

    // Pick up settings edits made since the last render.
    state.reload_settings().await?;

    // Lazy user creation: make sure a row with the current display name
    // exists before anything joins against it.
    let name = state.chat.user_name(user_id).await?;
    state.user_repo.ensure(user_id, &name).await?;

    state.chat.publish_home(user_id, views::attendance::loading_view()).await?;
    attendance::render_home(state, user_id, 0, EventFilter::All).await
}
