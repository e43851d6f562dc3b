use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One attendance transition, joined with the user's display name.
/// Statuses are stored as the display labels that were active at write
/// time, so the audit trail stays readable even after labels change.
/// Rows are never updated or deleted.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct HistoryEntry {
    pub event_id: i64,
    pub user_id: String,
    pub user_name: String,
    pub old_status: String,
    pub new_status: String,
    pub old_note: Option<String>,
    pub new_note: Option<String>,
    pub timestamp: DateTime<Utc>,
}
