use serde_json::Value;

use crate::api::actions::ModalKind;
use crate::api::views;
use crate::domain::models::event::Event;
use crate::domain::services::paging::NavToken;
use crate::error::AppError;
use crate::state::AppState;

async fn group_members(state: &AppState, group: Option<&str>) -> Result<Vec<String>, AppError> {
    match group {
        Some(group) => state.chat.usergroup_members(group).await,
        None => Ok(Vec::new()),
    }
}

async fn load_event(state: &AppState, event_id: i64) -> Result<Event, AppError> {
    state
        .event_repo
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))
}

async fn participants_view(state: &AppState, event_id: i64, page: u8) -> Result<Value, AppError> {
    let event = load_event(state, event_id).await?;
    let participants = state.participation_repo.list_by_event(event_id).await?;
    let settings = state.settings();
    let open = group_members(state, settings.open_players_group.as_deref()).await?;
    let women = group_members(state, settings.women_players_group.as_deref()).await?;
    Ok(views::participants::participants_modal(
        &event,
        &participants,
        &state.vocabulary(),
        &open,
        &women,
        page,
    ))
}

async fn missing_players_view(state: &AppState, event_id: i64, page: u8) -> Result<Value, AppError> {
    load_event(state, event_id).await?;
    let participants = state.participation_repo.list_by_event(event_id).await?;
    let settings = state.settings();
    let open = group_members(state, settings.open_players_group.as_deref()).await?;
    let women = group_members(state, settings.women_players_group.as_deref()).await?;
    let users: Vec<(String, String)> = state
        .user_repo
        .list()
        .await?
        .into_iter()
        .map(|u| (u.user_id, u.name))
        .collect();
    Ok(views::participants::missing_players_modal(
        event_id,
        &participants,
        &open,
        &women,
        &users,
        page,
    ))
}

async fn history_view(state: &AppState, event_id: i64, page: u32) -> Result<Value, AppError> {
    load_event(state, event_id).await?;
    let entries = state.history_repo.list_by_event(event_id).await?;
    Ok(views::participants::history_modal(event_id, &entries, page))
}

pub async fn open_participants(state: &AppState, trigger_id: &str, event_id: i64) -> Result<(), AppError> {
    let view = participants_view(state, event_id, 0).await?;
    state.chat.open_modal(trigger_id, view).await
}

pub async fn open_missing_players(state: &AppState, trigger_id: &str, event_id: i64) -> Result<(), AppError> {
    let view = missing_players_view(state, event_id, 0).await?;
    state.chat.open_modal(trigger_id, view).await
}

pub async fn open_history(state: &AppState, trigger_id: &str, event_id: i64) -> Result<(), AppError> {
    let view = history_view(state, event_id, 0).await?;
    state.chat.open_modal(trigger_id, view).await
}

/// Navigation inside one of the three event modals. The modal's event id
/// travels in the view's private metadata for the tabbed views, in the
/// token itself for history.
pub async fn go_to_modal_page(
    state: &AppState,
    view_id: &str,
    private_metadata: &str,
    kind: ModalKind,
    token: NavToken,
) -> Result<(), AppError> {
    let view = match (kind, token) {
        (ModalKind::Participants, NavToken::StatusTab { page }) => {
            let event_id = parse_event_id(private_metadata)?;
            participants_view(state, event_id, page).await?
        }
        (ModalKind::MissingPlayers, NavToken::StatusTab { page }) => {
            let event_id = parse_event_id(private_metadata)?;
            missing_players_view(state, event_id, page).await?
        }
        (ModalKind::History, NavToken::EventPage { page, event_id }) => {
            history_view(state, event_id, page).await?
        }
        (kind, token) => {
            return Err(AppError::Validation(format!(
                "Navigation token {:?} does not fit the {:?} modal",
                token, kind
            )))
        }
    };
    state.chat.update_modal(view_id, view).await
}

fn parse_event_id(private_metadata: &str) -> Result<i64, AppError> {
    private_metadata
        .parse()
        .map_err(|_| AppError::Validation("Modal carried a malformed event id".into()))
}
