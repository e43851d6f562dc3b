use chrono::Utc;
use tracing::info;

use crate::api::actions::StatusTarget;
use crate::api::handlers::LOCKED_MESSAGE;
use crate::api::payload::ViewState;
use crate::api::views;
use crate::domain::models::event::EventFilter;
use crate::domain::models::participation::AttendanceStatus;
use crate::domain::services::attendance::{mass_insert_window, submit_attendance, SubmitOutcome};
use crate::domain::services::paging::NavToken;
use crate::error::AppError;
use crate::state::AppState;

/// Renders the home attendance list at one (page, filter) position.
pub async fn render_home(
    state: &AppState,
    user_id: &str,
    page: u32,
    filter: EventFilter,
) -> Result<(), AppError> {
    let settings = state.settings();
    let events = state.event_repo.list_upcoming(filter).await?;
    let records = state.participation_repo.list_for_user(user_id).await?;
    let is_admin = state.is_admin(user_id).await?;
    let groups_configured =
        settings.open_players_group.is_some() && settings.women_players_group.is_some();

    let view = views::attendance::home_view(
        &events,
        &records,
        &state.vocabulary(),
        is_admin,
        groups_configured,
        page,
        filter,
        Utc::now(),
    );
    state.chat.publish_home(user_id, view).await
}

pub async fn go_to_page(state: &AppState, user_id: &str, token: NavToken) -> Result<(), AppError> {
    match token {
        NavToken::EventList { page, filter } => render_home(state, user_id, page, filter).await,
        other => Err(AppError::Validation(format!(
            "Unexpected navigation target for the attendance list: {:?}",
            other
        ))),
    }
}

/// A status button press from the home list: write the ledger (unless the
/// event is locked) and re-render the same page.
pub async fn set_status(
    state: &AppState,
    user_id: &str,
    status: AttendanceStatus,
    target: StatusTarget,
    view_state: Option<&ViewState>,
) -> Result<(), AppError> {
    let note_block = format!("note_{}", target.event_id);
    let note_action = format!("note_input_{}", target.event_id);
    let note = view_state.and_then(|vs| vs.text(&note_block, &note_action));

    let outcome = submit_attendance(
        state.event_repo.as_ref(),
        state.participation_repo.as_ref(),
        &state.vocabulary(),
        target.event_id,
        user_id,
        status,
        note,
        true,
    )
    .await?;

    match outcome {
        SubmitOutcome::Recorded { .. } => {
            info!("Attendance recorded: user {} event {} -> {}", user_id, target.event_id, status.as_canonical());
        }
        SubmitOutcome::Locked => {
            state.chat.post_message(user_id, LOCKED_MESSAGE).await?;
        }
    }

    render_home(state, user_id, target.page, target.filter).await
}

pub async fn open_filter_modal(
    state: &AppState,
    trigger_id: &str,
    current: EventFilter,
) -> Result<(), AppError> {
    state.chat.open_modal(trigger_id, views::attendance::filter_modal(current)).await
}

/// Filter submission: back to page 0 of the chosen category.
pub async fn apply_filter(state: &AppState, user_id: &str, view_state: &ViewState) -> Result<(), AppError> {
    let filter = match view_state.selected("filter_block", "filter_choice") {
        Some(raw) => EventFilter::parse(raw)?,
        None => EventFilter::All,
    };
    render_home(state, user_id, 0, filter).await
}

pub async fn open_mass_insert_modal(state: &AppState, trigger_id: &str) -> Result<(), AppError> {
    state.chat.open_modal(trigger_id, views::attendance::mass_insert_modal(&state.vocabulary())).await
}

/// Bulk fill: apply one status to every still-open training between today
/// and the end of next month. Locked trainings are filtered out up front
/// and skipped if they lock mid-run.
pub async fn apply_mass_insert(
    state: &AppState,
    user_id: &str,
    view_state: &ViewState,
) -> Result<(), AppError> {
    let status = AttendanceStatus::parse(
        view_state.required_selected("status_block", "status_choice", "attendance")?,
    )?;
    let note = view_state.text("note_block", "note_input");

    let now = Utc::now();
    let (_, until) = mass_insert_window(now);
    let events = state.event_repo.list_unlocked_trainings(now, until).await?;

    let vocabulary = state.vocabulary();
    for event in &events {
        submit_attendance(
            state.event_repo.as_ref(),
            state.participation_repo.as_ref(),
            &vocabulary,
            event.id,
            user_id,
            status,
            note,
            true,
        )
        .await?;
    }
    info!("Mass insert by {}: {} trainings set to {}", user_id, events.len(), status.as_canonical());

    render_home(state, user_id, 0, EventFilter::All).await
}
