use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::models::user::UserCategory;
use crate::error::AppError;

/// Canonical attendance status. The ledger stores these tokens verbatim;
/// display labels are a presentation concern resolved through the
/// status vocabulary.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
pub enum AttendanceStatus {
    Coming,
    Late,
    #[sqlx(rename = "Not Coming")]
    #[serde(rename = "Not Coming")]
    NotComing,
}

impl AttendanceStatus {
    /// Parses a canonical token. Unknown values are rejected, never coerced.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "Coming" => Ok(AttendanceStatus::Coming),
            "Late" => Ok(AttendanceStatus::Late),
            "Not Coming" => Ok(AttendanceStatus::NotComing),
            other => Err(AppError::Validation(format!("Unknown attendance status: {}", other))),
        }
    }

    pub fn as_canonical(&self) -> &'static str {
        match self {
            AttendanceStatus::Coming => "Coming",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::NotComing => "Not Coming",
        }
    }
}

/// Current attendance state for one (event, user) pair. Single source of
/// truth; updated in place, never duplicated.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct ParticipationRecord {
    pub event_id: i64,
    pub user_id: String,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

/// Ledger row joined with the user it belongs to, as shown in the
/// participants and missing-players views.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EventParticipant {
    pub user_id: String,
    pub name: String,
    pub category: Option<UserCategory>,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

/// Flattened export row: one participant of one event inside a date range.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AttendanceRow {
    pub user_name: String,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub event_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Trims a submitted note; an empty trimmed note is stored as NULL.
pub fn normalize_note(note: Option<&str>) -> Option<String> {
    match note {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_only_canonical_tokens() {
        assert_eq!(AttendanceStatus::parse("Coming").unwrap(), AttendanceStatus::Coming);
        assert_eq!(AttendanceStatus::parse("Not Coming").unwrap(), AttendanceStatus::NotComing);
        assert!(AttendanceStatus::parse("coming").is_err());
        assert!(AttendanceStatus::parse("Maybe").is_err());
        assert!(AttendanceStatus::parse("").is_err());
    }

    #[test]
    fn normalize_note_trims_and_drops_empty() {
        assert_eq!(normalize_note(Some("  back late ")), Some("back late".to_string()));
        assert_eq!(normalize_note(Some("   ")), None);
        assert_eq!(normalize_note(Some("")), None);
        assert_eq!(normalize_note(None), None);
    }
}
