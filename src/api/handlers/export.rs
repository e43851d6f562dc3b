use serde_json::{json, Value};
use tracing::info;

use crate::api::payload::ViewState;
use crate::api::views;
use crate::domain::services::export::{attendance_csv, export_filename};
use crate::error::AppError;
use crate::state::AppState;

pub async fn open_export_modal(state: &AppState, trigger_id: &str) -> Result<(), AppError> {
    state.chat.open_modal(trigger_id, views::edit::export_modal()).await
}

/// Date-range submission: render the CSV in memory, upload it into the
/// configured export channel and confirm by DM. A reversed range is
/// rejected inside the modal.
pub async fn apply_export(
    state: &AppState,
    user_id: &str,
    view_state: &ViewState,
) -> Result<Option<Value>, AppError> {
    let start = view_state.date("start_date_block", "start_date_select", "start date")?;
    let end = view_state.date("end_date_block", "end_date_select", "end date")?;

    if start > end {
        return Ok(Some(json!({
            "response_action": "errors",
            "errors": { "start_date_block": "The start date must not be after the end date." },
        })));
    }

    let channel = state
        .settings()
        .export_channel
        .clone()
        .ok_or_else(|| AppError::Validation("No export channel is configured.".into()))?;

    let rows = state.participation_repo.list_in_range(start, end).await?;
    let csv = attendance_csv(&rows);
    let filename = export_filename(start, end);

    state.chat.upload_file(&filename, csv.as_bytes(), &channel).await?;
    info!("Exported {} attendance rows to channel {}", rows.len(), channel);

    let channel_name = state.chat.channel_name(&channel).await?;
    state
        .chat
        .post_message(user_id, &format!("✅ Attendance was exported to #{}", channel_name))
        .await?;
    Ok(None)
}
