use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::json;

use crate::api::actions::{Action, EventMenuItem, MenuChoice, Submission};
use crate::api::handlers::{attendance, edit, events, export, participants, report_error, settings};
use crate::api::payload::{
    BlockActionsPayload, BlockSuggestionPayload, InteractionEnvelope, InteractionPayload,
    ViewState, ViewSubmissionPayload,
};
use crate::domain::models::event::EventFilter;
use crate::error::AppError;
use crate::state::AppState;

/// Interactivity endpoint: block actions, view submissions and external
/// select queries all arrive here as one form-encoded JSON payload.
pub async fn handle_interaction(
    State(state): State<Arc<AppState>>,
    Form(envelope): Form<InteractionEnvelope>,
) -> Result<Response, AppError> {
    let payload: InteractionPayload = serde_json::from_str(&envelope.payload)
        .map_err(|e| AppError::Validation(format!("Malformed interaction payload: {}", e)))?;

    match payload {
        InteractionPayload::BlockActions(payload) => handle_block_actions(&state, payload).await,
        InteractionPayload::ViewSubmission(payload) => handle_view_submission(&state, payload).await,
        InteractionPayload::BlockSuggestion(payload) => handle_block_suggestion(&state, payload).await,
    }
}

fn trigger(payload: &BlockActionsPayload) -> Result<&str, AppError> {
    payload
        .trigger_id
        .as_deref()
        .ok_or_else(|| AppError::Validation("Interaction carried no trigger id".into()))
}

fn view_state(payload: &BlockActionsPayload) -> Result<&ViewState, AppError> {
    payload
        .view
        .as_ref()
        .map(|v| &v.state)
        .ok_or_else(|| AppError::Validation("Interaction carried no view state".into()))
}

fn view_id(payload: &BlockActionsPayload) -> Result<&str, AppError> {
    payload
        .container
        .as_ref()
        .and_then(|c| c.view_id.as_deref())
        .or(payload.view.as_ref().map(|v| v.id.as_str()))
        .ok_or_else(|| AppError::Validation("Interaction carried no view id".into()))
}

async fn ensure_admin(state: &AppState, user_id: &str) -> Result<(), AppError> {
    if state.is_admin(user_id).await? {
        Ok(())
    } else {
        Err(AppError::Validation("This action is restricted to attendance admins.".into()))
    }
}

async fn handle_block_actions(
    state: &AppState,
    payload: BlockActionsPayload,
) -> Result<Response, AppError> {
    let user_id = payload.user.id.clone();
    let Some(item) = payload.actions.first() else {
        return Ok(StatusCode::OK.into_response());
    };

    let outcome = match Action::parse(item) {
        Ok(action) => run_action(state, &user_id, action, &payload).await,
        Err(err) => Err(err),
    };
    if let Err(err) = outcome {
        report_error(state, &user_id, &err).await;
    }
    Ok(StatusCode::OK.into_response())
}

async fn run_action(
    state: &AppState,
    user_id: &str,
    action: Action,
    payload: &BlockActionsPayload,
) -> Result<(), AppError> {
    match action {
        Action::MainMenu(choice) => match choice {
            MenuChoice::Refresh => attendance::render_home(state, user_id, 0, EventFilter::All).await,
            MenuChoice::MassInsert => attendance::open_mass_insert_modal(state, trigger(payload)?).await,
            MenuChoice::EditAttendance => {
                ensure_admin(state, user_id).await?;
                edit::render_edit_home(state, user_id).await
            }
            MenuChoice::Settings => {
                ensure_admin(state, user_id).await?;
                settings::render_settings(state, user_id).await
            }
            MenuChoice::ManageEvents => {
                ensure_admin(state, user_id).await?;
                events::render_manage(state, user_id, 0).await
            }
        },
        Action::OpenFilter { current } => {
            attendance::open_filter_modal(state, trigger(payload)?, current).await
        }
        Action::SetStatus { status, target } => {
            attendance::set_status(state, user_id, status, target, payload.view.as_ref().map(|v| &v.state)).await
        }
        Action::AttendancePage { token } => attendance::go_to_page(state, user_id, token).await,
        Action::EventMenu(choice) => match choice.item {
            EventMenuItem::Participants => {
                participants::open_participants(state, trigger(payload)?, choice.event_id).await
            }
            EventMenuItem::Details => events::open_details(state, trigger(payload)?, choice.event_id).await,
            EventMenuItem::History => {
                participants::open_history(state, trigger(payload)?, choice.event_id).await
            }
            EventMenuItem::MissingPlayers => {
                participants::open_missing_players(state, trigger(payload)?, choice.event_id).await
            }
            EventMenuItem::Share => events::open_share_modal(state, trigger(payload)?, choice.event_id).await,
        },
        Action::EventListPage { token } => {
            ensure_admin(state, user_id).await?;
            events::go_to_page(state, user_id, token).await
        }
        Action::ModalPage { kind, token } => {
            let metadata = payload
                .view
                .as_ref()
                .map(|v| v.private_metadata.as_str())
                .unwrap_or_default();
            participants::go_to_modal_page(state, view_id(payload)?, metadata, kind, token).await
        }
        Action::GoToAttendance => attendance::render_home(state, user_id, 0, EventFilter::All).await,
        Action::GoToAddEvent => {
            ensure_admin(state, user_id).await?;
            events::render_add_form(state, user_id).await
        }
        Action::GoToManageEvents => {
            ensure_admin(state, user_id).await?;
            events::render_manage(state, user_id, 0).await
        }
        Action::SubmitEvent => {
            ensure_admin(state, user_id).await?;
            events::submit_event(state, user_id, view_state(payload)?).await
        }
        Action::DeleteEvent(target) => {
            ensure_admin(state, user_id).await?;
            events::delete_event(state, user_id, target.event_id, target.page).await
        }
        Action::EditEvent { event_id } => {
            ensure_admin(state, user_id).await?;
            events::open_edit_modal(state, trigger(payload)?, event_id).await
        }
        Action::DuplicateEvent { event_id } => {
            ensure_admin(state, user_id).await?;
            events::open_duplicate_modal(state, trigger(payload)?, event_id).await
        }
        Action::SelectDate => {
            ensure_admin(state, user_id).await?;
            edit::show_events_by_day(state, user_id, view_state(payload)?).await
        }
        Action::SelectEvent { event_id } => {
            ensure_admin(state, user_id).await?;
            edit::show_event_editor(state, user_id, event_id).await
        }
        Action::ConfirmEditUser { event_id } => {
            ensure_admin(state, user_id).await?;
            edit::show_player_editor(state, user_id, event_id, view_state(payload)?).await
        }
        Action::EditStatus { status, target } => {
            ensure_admin(state, user_id).await?;
            edit::set_player_status(state, user_id, status, target).await
        }
        Action::ConfirmCategoryUser => {
            ensure_admin(state, user_id).await?;
            edit::show_category_editor(state, user_id, view_state(payload)?).await
        }
        Action::SetUserCategory { user_id: player_id, category } => {
            ensure_admin(state, user_id).await?;
            edit::set_player_category(state, user_id, &player_id, category).await
        }
        Action::SaveSettings => {
            ensure_admin(state, user_id).await?;
            settings::save_settings(state, user_id, view_state(payload)?).await
        }
        Action::ExportParticipants => {
            ensure_admin(state, user_id).await?;
            export::open_export_modal(state, trigger(payload)?).await
        }
        Action::OpenAttendanceModal { event_id } => {
            events::open_chat_attendance(state, trigger(payload)?, event_id).await
        }
        Action::Noop => Ok(()),
    }
}

async fn handle_view_submission(
    state: &AppState,
    payload: ViewSubmissionPayload,
) -> Result<Response, AppError> {
    let user_id = payload.user.id.clone();
    let view = &payload.view;

    let outcome = match Submission::parse(&view.callback_id, &view.private_metadata) {
        Ok(submission) => run_submission(state, &user_id, submission, &view.state).await,
        Err(err) => Err(err),
    };
    match outcome {
        Ok(Some(body)) => Ok(Json(body).into_response()),
        Ok(None) => Ok(StatusCode::OK.into_response()),
        Err(err) => {
            report_error(state, &user_id, &err).await;
            Ok(StatusCode::OK.into_response())
        }
    }
}

async fn run_submission(
    state: &AppState,
    user_id: &str,
    submission: Submission,
    view_state: &ViewState,
) -> Result<Option<serde_json::Value>, AppError> {
    match submission {
        Submission::Filter => {
            attendance::apply_filter(state, user_id, view_state).await?;
            Ok(None)
        }
        Submission::MassInsert => {
            attendance::apply_mass_insert(state, user_id, view_state).await?;
            Ok(None)
        }
        Submission::EditEvent { event_id } => {
            ensure_admin(state, user_id).await?;
            events::apply_edit(state, user_id, event_id, view_state).await?;
            Ok(None)
        }
        Submission::DuplicateEvent { event_id } => {
            ensure_admin(state, user_id).await?;
            events::apply_duplicate(state, user_id, event_id, view_state).await
        }
        Submission::ExportDates => {
            ensure_admin(state, user_id).await?;
            export::apply_export(state, user_id, view_state).await
        }
        Submission::ShareEvent { event_id } => {
            events::apply_share(state, user_id, event_id, view_state).await?;
            Ok(None)
        }
        Submission::ChatAttendance { event_id } => {
            events::apply_chat_attendance(state, user_id, event_id, view_state).await?;
            Ok(None)
        }
    }
}

async fn handle_block_suggestion(
    state: &AppState,
    payload: BlockSuggestionPayload,
) -> Result<Response, AppError> {
    match payload.action_id.as_str() {
        "user_search" | "category_user_search" => {
            let options = edit::search_users(state, &payload.value)
                .await
                .unwrap_or_else(|_| json!({ "options": [] }));
            Ok(Json(options).into_response())
        }
        _ => Ok(Json(json!({ "options": [] })).into_response()),
    }
}
