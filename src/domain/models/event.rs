use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
pub enum EventCategory {
    Training,
    Tournament,
    Other,
}

impl EventCategory {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "Training" => Ok(EventCategory::Training),
            "Tournament" => Ok(EventCategory::Tournament),
            "Other" => Ok(EventCategory::Other),
            other => Err(AppError::Validation(format!("Unknown event category: {}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Training => "Training",
            EventCategory::Tournament => "Tournament",
            EventCategory::Other => "Other",
        }
    }
}

/// Category filter for the upcoming-events list. `All` is the initial state;
/// picking a filter always resets the view to page 0.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventFilter {
    All,
    Training,
    Tournament,
    Other,
}

impl EventFilter {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "all" => Ok(EventFilter::All),
            "training" => Ok(EventFilter::Training),
            "tournament" => Ok(EventFilter::Tournament),
            "other" => Ok(EventFilter::Other),
            other => Err(AppError::Validation(format!("Unknown event filter: {}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventFilter::All => "all",
            EventFilter::Training => "training",
            EventFilter::Tournament => "tournament",
            EventFilter::Other => "other",
        }
    }

    pub fn category(&self) -> Option<EventCategory> {
        match self {
            EventFilter::All => None,
            EventFilter::Training => Some(EventCategory::Training),
            EventFilter::Tournament => Some(EventCategory::Tournament),
            EventFilter::Other => Some(EventCategory::Other),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub lock_time: DateTime<Utc>,
    pub category: EventCategory,
    pub address: Option<String>,
}

impl Event {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        now > self.lock_time
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub lock_time: DateTime<Utc>,
    pub category: EventCategory,
    pub address: Option<String>,
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Event name must not be empty".into()));
        }
        if self.start_time > self.end_time {
            return Err(AppError::Validation("Event start must not be after its end".into()));
        }
        Ok(())
    }
}
