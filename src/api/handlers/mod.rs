pub mod attendance;
pub mod edit;
pub mod events;
pub mod events_api;
pub mod export;
pub mod health;
pub mod interaction;
pub mod participants;
pub mod settings;

use tracing::error;

use crate::error::AppError;
use crate::state::AppState;

pub(crate) const LOCKED_MESSAGE: &str =
    "Too late, the deadline has already passed. Try in time next round?";

/// Failures of an interaction are reported back to the acting user as a
/// direct message and logged; nothing is retried.
pub(crate) async fn report_error(state: &AppState, user_id: &str, err: &AppError) {
    error!("Interaction failed for user {}: {}", user_id, err);
    let message = match err {
        AppError::Validation(msg) => msg.clone(),
        AppError::NotFound(msg) => msg.clone(),
        AppError::Database(_) => "❌ Saving failed. Please try again later.".to_string(),
        AppError::Upstream(_) => "❌ The chat platform did not respond. Please try again later.".to_string(),
        AppError::Internal => "❌ Unexpected error. Please try again later.".to_string(),
    };
    let _ = state.chat.post_message(user_id, &message).await;
}
