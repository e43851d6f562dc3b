use serde_json::Value;
use tracing::info;

use crate::api::actions::EditStatusTarget;
use crate::api::payload::ViewState;
use crate::api::views;
use crate::domain::models::participation::AttendanceStatus;
use crate::domain::models::user::{User, UserCategory};
use crate::domain::services::attendance::submit_attendance;
use crate::error::AppError;
use crate::state::AppState;

async fn load_user(state: &AppState, user_id: &str) -> Result<User, AppError> {
    state
        .user_repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

fn has_export(state: &AppState) -> bool {
    state.settings().export_channel.is_some()
}

/// Entry screen of the admin edit flow.
pub async fn render_edit_home(state: &AppState, user_id: &str) -> Result<(), AppError> {
    state
        .chat
        .publish_home(user_id, views::edit::edit_home_view(has_export(state)))
        .await
}

/// Date picked: list that day's events.
pub async fn show_events_by_day(
    state: &AppState,
    user_id: &str,
    view_state: &ViewState,
) -> Result<(), AppError> {
    let date = view_state.date("date_block", "date_select", "date")?;
    let events = state.event_repo.list_by_date(date).await?;
    state
        .chat
        .publish_home(user_id, views::edit::events_by_day_view(&events, has_export(state)))
        .await
}

/// Event picked: show the per-event editor without a player yet.
pub async fn show_event_editor(state: &AppState, user_id: &str, event_id: i64) -> Result<(), AppError> {
    render_editor(state, user_id, event_id, None).await
}

/// Player confirmed in the picker: show their current status buttons.
pub async fn show_player_editor(
    state: &AppState,
    user_id: &str,
    event_id: i64,
    view_state: &ViewState,
) -> Result<(), AppError> {
    let selected = view_state
        .selected("user_pick_block", "user_search")
        .ok_or_else(|| AppError::Validation("Pick a player first".into()))?
        .to_string();
    render_editor(state, user_id, event_id, Some(&selected)).await
}

async fn render_editor(
    state: &AppState,
    viewer_id: &str,
    event_id: i64,
    player_id: Option<&str>,
) -> Result<(), AppError> {
    let event = state
        .event_repo
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

    let view = match player_id {
        Some(player_id) => {
            let player = load_user(state, player_id).await?;
            let record = state.participation_repo.get(event_id, player_id).await?;
            views::edit::edit_players_view(&event, Some((&player, record.as_ref())), &state.vocabulary())
        }
        None => views::edit::edit_players_view(&event, None, &state.vocabulary()),
    };
    state.chat.publish_home(viewer_id, view).await
}

/// Admin override of another player's status. The lock cutoff does not
/// apply here, and the flow carries no note input, so the stored note is
/// replaced by the (absent) submitted one.
pub async fn set_player_status(
    state: &AppState,
    viewer_id: &str,
    status: AttendanceStatus,
    target: EditStatusTarget,
) -> Result<(), AppError> {
    submit_attendance(
        state.event_repo.as_ref(),
        state.participation_repo.as_ref(),
        &state.vocabulary(),
        target.event_id,
        &target.user_id,
        status,
        None,
        false,
    )
    .await?;
    info!(
        "Attendance override by {}: user {} event {} -> {}",
        viewer_id,
        target.user_id,
        target.event_id,
        status.as_canonical()
    );
    render_editor(state, viewer_id, target.event_id, Some(&target.user_id)).await
}

/// Player confirmed in the category picker.
pub async fn show_category_editor(
    state: &AppState,
    viewer_id: &str,
    view_state: &ViewState,
) -> Result<(), AppError> {
    let selected = view_state
        .selected("user_pick_block", "category_user_search")
        .ok_or_else(|| AppError::Validation("Pick a player first".into()))?
        .to_string();
    let player = load_user(state, &selected).await?;
    state
        .chat
        .publish_home(viewer_id, views::edit::edit_category_view(&player))
        .await
}

pub async fn set_player_category(
    state: &AppState,
    viewer_id: &str,
    player_id: &str,
    category: UserCategory,
) -> Result<(), AppError> {
    state.user_repo.set_category(player_id, category).await?;
    info!("Category of {} set to {}", player_id, category.as_str());
    let player = load_user(state, player_id).await?;
    state
        .chat
        .publish_home(viewer_id, views::edit::edit_category_view(&player))
        .await
}

/// Options for the player external-selects, filtered by the typed query.
pub async fn search_users(state: &AppState, query: &str) -> Result<Value, AppError> {
    let users = state.user_repo.list().await?;
    Ok(views::edit::user_options(&users, query))
}
