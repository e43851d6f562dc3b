use chrono::Duration;
use serde_json::json;
use tracing::info;

use crate::api::handlers::LOCKED_MESSAGE;
use crate::api::payload::ViewState;
use crate::api::views;
use crate::domain::models::event::{Event, EventCategory, EventFilter, NewEvent};
use crate::domain::models::participation::AttendanceStatus;
use crate::domain::services::attendance::{submit_attendance, SubmitOutcome};
use crate::domain::services::paging::NavToken;
use crate::error::AppError;
use crate::state::AppState;

const MAX_DUPLICATES: i64 = 52;

async fn load_event(state: &AppState, event_id: i64) -> Result<Event, AppError> {
    state
        .event_repo
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))
}

/// Admin event list, one page at a time.
pub async fn render_manage(state: &AppState, user_id: &str, page: u32) -> Result<(), AppError> {
    let events = state.event_repo.list_upcoming(EventFilter::All).await?;
    let view = if events.is_empty() {
        views::events::empty_events_view()
    } else {
        views::events::manage_events_view(&events, page)
    };
    state.chat.publish_home(user_id, view).await
}

pub async fn go_to_page(state: &AppState, user_id: &str, token: NavToken) -> Result<(), AppError> {
    match token {
        NavToken::EventList { page, .. } => render_manage(state, user_id, page).await,
        other => Err(AppError::Validation(format!(
            "Unexpected navigation target for the event list: {:?}",
            other
        ))),
    }
}

pub async fn render_add_form(state: &AppState, user_id: &str) -> Result<(), AppError> {
    state.chat.publish_home(user_id, views::events::add_event_view()).await
}

/// Creation form submission. All four times come from datetime pickers;
/// the address is optional.
pub async fn submit_event(state: &AppState, user_id: &str, view_state: &ViewState) -> Result<(), AppError> {
    let event = NewEvent {
        name: view_state.required_text("name_block", "name_input", "event name")?.to_string(),
        start_time: view_state.date_time("start_time_block", "start_time_input", "start")?,
        end_time: view_state.date_time("end_time_block", "end_time_input", "end")?,
        lock_time: view_state.date_time("lock_time_block", "lock_time_input", "deadline")?,
        category: EventCategory::parse(
            view_state.required_selected("category_block", "category_input", "category")?,
        )?,
        address: view_state.text("address_block", "address_input").map(str::to_string),
    };
    event.validate()?;

    let created = state.event_repo.create(&event).await?;
    info!("Event created: {} ({})", created.name, created.id);

    state
        .chat
        .post_message(user_id, &format!("The event {} was added!", created.name))
        .await?;
    render_manage(state, user_id, 0).await
}

pub async fn delete_event(state: &AppState, user_id: &str, event_id: i64, page: u32) -> Result<(), AppError> {
    state.event_repo.delete(event_id).await?;
    info!("Event deleted: {}", event_id);
    state.chat.post_message(user_id, "The event was deleted.").await?;
    render_manage(state, user_id, page).await
}

pub async fn open_details(state: &AppState, trigger_id: &str, event_id: i64) -> Result<(), AppError> {
    let event = load_event(state, event_id).await?;
    state.chat.open_modal(trigger_id, views::events::details_modal(&event)).await
}

pub async fn open_edit_modal(state: &AppState, trigger_id: &str, event_id: i64) -> Result<(), AppError> {
    let event = load_event(state, event_id).await?;
    state.chat.open_modal(trigger_id, views::events::edit_modal(&event)).await
}

pub async fn apply_edit(
    state: &AppState,
    user_id: &str,
    event_id: i64,
    view_state: &ViewState,
) -> Result<(), AppError> {
    let name = view_state.required_text("name_block", "name_input", "event name")?;
    let category = EventCategory::parse(
        view_state.required_selected("category_block", "category_input", "category")?,
    )?;
    let lock_time = view_state.date_time("lock_time_block", "lock_time_input", "deadline")?;
    let address = view_state.text("address_block", "address_input");

    let updated = state
        .event_repo
        .update_details(event_id, name, category, address, lock_time)
        .await?;
    info!("Event updated: {}", updated.id);

    state
        .chat
        .post_message(user_id, &format!("The event {} was updated.", updated.name))
        .await?;
    render_manage(state, user_id, 0).await
}

pub async fn open_duplicate_modal(state: &AppState, trigger_id: &str, event_id: i64) -> Result<(), AppError> {
    load_event(state, event_id).await?;
    state.chat.open_modal(trigger_id, views::events::duplicate_modal(event_id)).await
}

/// Duplication submission: N weekly copies. An out-of-range count is
/// rejected inside the modal rather than by DM.
pub async fn apply_duplicate(
    state: &AppState,
    user_id: &str,
    event_id: i64,
    view_state: &ViewState,
) -> Result<Option<serde_json::Value>, AppError> {
    let raw = view_state.required_text("count_block", "count_input", "number of copies")?;
    let count: i64 = match raw.parse() {
        Ok(count) if (1..=MAX_DUPLICATES).contains(&count) => count,
        Ok(_) => {
            return Ok(Some(json!({
                "response_action": "errors",
                "errors": { "count_block": format!("The number of copies must be between 1 and {}.", MAX_DUPLICATES) },
            })))
        }
        Err(_) => {
            return Ok(Some(json!({
                "response_action": "errors",
                "errors": { "count_block": "Please enter a valid number." },
            })))
        }
    };

    let original = load_event(state, event_id).await?;
    for week in 1..=count {
        let offset = Duration::weeks(week);
        let copy = NewEvent {
            name: original.name.clone(),
            start_time: original.start_time + offset,
            end_time: original.end_time + offset,
            lock_time: original.lock_time + offset,
            category: original.category,
            address: original.address.clone(),
        };
        state.event_repo.create(&copy).await?;
    }
    info!("Event {} duplicated {} times", event_id, count);

    state
        .chat
        .post_message(user_id, &format!("The event {} was duplicated {} times.", original.name, count))
        .await?;
    render_manage(state, user_id, 0).await?;
    Ok(None)
}

pub async fn open_share_modal(state: &AppState, trigger_id: &str, event_id: i64) -> Result<(), AppError> {
    load_event(state, event_id).await?;
    let channels = state.chat.list_channels().await?;
    state.chat.open_modal(trigger_id, views::events::share_modal(event_id, &channels)).await
}

pub async fn apply_share(
    state: &AppState,
    user_id: &str,
    event_id: i64,
    view_state: &ViewState,
) -> Result<(), AppError> {
    let text = view_state.required_text("message_block", "message_input", "message")?;
    let channel = view_state.required_selected("channel_block", "channel_select", "channel")?;
    load_event(state, event_id).await?;

    state
        .chat
        .post_blocks(channel, text, views::events::share_message_blocks(event_id, text))
        .await?;
    state.chat.post_message(user_id, "The event was shared.").await
}

/// "Submit attendance" button on a shared channel message.
pub async fn open_chat_attendance(state: &AppState, trigger_id: &str, event_id: i64) -> Result<(), AppError> {
    let event = load_event(state, event_id).await?;
    state
        .chat
        .open_modal(trigger_id, views::attendance::chat_attendance_modal(&event, &state.vocabulary()))
        .await
}

pub async fn apply_chat_attendance(
    state: &AppState,
    user_id: &str,
    event_id: i64,
    view_state: &ViewState,
) -> Result<(), AppError> {
    let status = AttendanceStatus::parse(
        view_state.required_selected("status_block", "status_choice", "attendance")?,
    )?;
    let note = view_state.text("note_block", "note_input");

    let outcome = submit_attendance(
        state.event_repo.as_ref(),
        state.participation_repo.as_ref(),
        &state.vocabulary(),
        event_id,
        user_id,
        status,
        note,
        true,
    )
    .await?;

    if let SubmitOutcome::Locked = outcome {
        state.chat.post_message(user_id, LOCKED_MESSAGE).await?;
    }
    Ok(())
}
