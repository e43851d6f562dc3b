use crate::domain::models::{
    event::{Event, EventFilter, NewEvent, EventCategory},
    history::HistoryEntry,
    participation::{AttendanceRow, AttendanceStatus, EventParticipant, ParticipationRecord},
    settings::AppSettings,
    user::{User, UserCategory},
};
use crate::domain::services::vocabulary::StatusVocabulary;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &NewEvent) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError>;
    /// Events whose end lies in the future, soonest first, optionally
    /// narrowed to one category.
    async fn list_upcoming(&self, filter: EventFilter) -> Result<Vec<Event>, AppError>;
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Event>, AppError>;
    /// Training events the mass-insert flow may still write to: lock time
    /// in the future, starting no later than `until`.
    async fn list_unlocked_trainings(&self, now: DateTime<Utc>, until: NaiveDate) -> Result<Vec<Event>, AppError>;
    async fn update_details(
        &self,
        id: i64,
        name: &str,
        category: EventCategory,
        address: Option<&str>,
        lock_time: DateTime<Utc>,
    ) -> Result<Event, AppError>;
    /// Removes the event together with its participation and history rows.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates the user on first contact, refreshing the stored name on
    /// later calls.
    async fn ensure(&self, user_id: &str, name: &str) -> Result<(), AppError>;
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn set_category(&self, user_id: &str, category: UserCategory) -> Result<(), AppError>;
}

#[async_trait]
pub trait ParticipationRepository: Send + Sync {
    async fn get(&self, event_id: i64, user_id: &str) -> Result<Option<ParticipationRecord>, AppError>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ParticipationRecord>, AppError>;
    async fn list_by_event(&self, event_id: i64) -> Result<Vec<EventParticipant>, AppError>;
    async fn list_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<AttendanceRow>, AppError>;
    /// Read-modify-write of one ledger row plus exactly one history append,
    /// linearized in a single transaction. Returns the prior record (absent
    /// on first submission) and the stored one. The note is trimmed and an
    /// empty note becomes NULL. Fails with NotFound when the event does not
    /// exist; nothing is written in that case.
    async fn upsert(
        &self,
        event_id: i64,
        user_id: &str,
        status: AttendanceStatus,
        note: Option<&str>,
        vocabulary: &StatusVocabulary,
    ) -> Result<(Option<ParticipationRecord>, ParticipationRecord), AppError>;
}

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Full transition log for one event, newest first. The log is written
    /// only from the ledger upsert transaction; no append is exposed here.
    async fn list_by_event(&self, event_id: i64) -> Result<Vec<HistoryEntry>, AppError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn load(&self) -> Result<AppSettings, AppError>;
    async fn save(&self, settings: &AppSettings) -> Result<(), AppError>;
}

/// Outbound chat-platform API. Every call is a single bounded-timeout HTTP
/// request; failures surface as `AppError::Upstream` and are never retried.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn publish_home(&self, user_id: &str, view: Value) -> Result<(), AppError>;
    async fn open_modal(&self, trigger_id: &str, view: Value) -> Result<(), AppError>;
    async fn update_modal(&self, view_id: &str, view: Value) -> Result<(), AppError>;
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), AppError>;
    async fn post_blocks(&self, channel: &str, text: &str, blocks: Value) -> Result<(), AppError>;
    async fn user_name(&self, user_id: &str) -> Result<String, AppError>;
    async fn usergroup_members(&self, group_id: &str) -> Result<Vec<String>, AppError>;
    /// (id, name) pairs of all usergroups in the workspace.
    async fn list_usergroups(&self) -> Result<Vec<(String, String)>, AppError>;
    /// (id, name) pairs of all non-archived channels.
    async fn list_channels(&self) -> Result<Vec<(String, String)>, AppError>;
    async fn channel_name(&self, channel_id: &str) -> Result<String, AppError>;
    async fn upload_file(&self, filename: &str, content: &[u8], channel_id: &str) -> Result<(), AppError>;
}
