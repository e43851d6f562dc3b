use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::domain::models::participation::{AttendanceStatus, ParticipationRecord};
use crate::domain::ports::{EventRepository, ParticipationRepository};
use crate::domain::services::vocabulary::StatusVocabulary;
use crate::error::AppError;

/// Result of one attendance submission. `Locked` means the event's lock
/// time has passed and nothing was written.
#[derive(Debug)]
pub enum SubmitOutcome {
    Recorded {
        previous: Option<ParticipationRecord>,
        current: ParticipationRecord,
    },
    Locked,
}

/// Shared write path for every attendance flow. Looks the event up,
/// optionally enforces the lock cutoff, and runs the ledger upsert (which
/// appends the matching history entry in the same transaction). Admin
/// overrides pass `enforce_lock = false`.
pub async fn submit_attendance(
    events: &dyn EventRepository,
    participation: &dyn ParticipationRepository,
    vocabulary: &StatusVocabulary,
    event_id: i64,
    user_id: &str,
    status: AttendanceStatus,
    note: Option<&str>,
    enforce_lock: bool,
) -> Result<SubmitOutcome, AppError> {
    let event = events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

    if enforce_lock && event.is_locked(Utc::now()) {
        return Ok(SubmitOutcome::Locked);
    }

    let (previous, current) = participation
        .upsert(event_id, user_id, status, note, vocabulary)
        .await?;

    Ok(SubmitOutcome::Recorded { previous, current })
}

/// Window targeted by the mass-insert flow: from today through the last
/// day of next month.
pub fn mass_insert_window(now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
    let today = now.date_naive();
    let (next_year, next_month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    let (after_year, after_month) = if next_month == 12 {
        (next_year + 1, 1)
    } else {
        (next_year, next_month + 1)
    };
    let last_of_next = NaiveDate::from_ymd_opt(after_year, after_month, 1)
        .expect("first of month is always valid")
        .pred_opt()
        .expect("month has a last day");
    (today, last_of_next)
}
