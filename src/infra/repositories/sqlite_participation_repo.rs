use crate::domain::models::event::EventCategory;
use crate::domain::models::participation::{
    normalize_note, AttendanceRow, AttendanceStatus, EventParticipant, ParticipationRecord,
};
use crate::domain::ports::ParticipationRepository;
use crate::domain::services::vocabulary::{StatusVocabulary, UNSET_LABEL};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

pub struct SqliteParticipationRepo {
    pool: SqlitePool,
}

impl SqliteParticipationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipationRepository for SqliteParticipationRepo {
    async fn get(&self, event_id: i64, user_id: &str) -> Result<Option<ParticipationRecord>, AppError> {
        sqlx::query_as::<_, ParticipationRecord>(
            "SELECT event_id, user_id, status, note FROM participants WHERE event_id = ? AND user_id = ?"
        )
            .bind(event_id).bind(user_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ParticipationRecord>, AppError> {
        sqlx::query_as::<_, ParticipationRecord>(
            "SELECT event_id, user_id, status, note FROM participants WHERE user_id = ?"
        )
            .bind(user_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: i64) -> Result<Vec<EventParticipant>, AppError> {
        sqlx::query_as::<_, EventParticipant>(
            "SELECT p.user_id, u.name, u.category, p.status, p.note
             FROM participants p
             JOIN users u ON u.user_id = p.user_id
             WHERE p.event_id = ?
             ORDER BY u.name ASC"
        )
            .bind(event_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<AttendanceRow>, AppError> {
        sqlx::query_as::<_, AttendanceRow>(
            "SELECT u.name AS user_name, p.status, p.note, e.name AS event_name, e.start_time, e.end_time
             FROM participants p
             JOIN users u ON u.user_id = p.user_id
             JOIN events e ON e.id = p.event_id
             WHERE date(e.start_time) >= ? AND date(e.end_time) <= ?
             ORDER BY e.start_time ASC, u.name ASC"
        )
            .bind(start).bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn upsert(
        &self,
        event_id: i64,
        user_id: &str,
        status: AttendanceStatus,
        note: Option<&str>,
        vocabulary: &StatusVocabulary,
    ) -> Result<(Option<ParticipationRecord>, ParticipationRecord), AppError> {
        let note = normalize_note(note);

        // One transaction covers the category lookup, the ledger write and
        // the history append: either all of it commits or none of it does.
        // SQLite's single-writer transactions linearize concurrent upserts
        // on the same key; the UNIQUE(event_id, user_id) constraint is the
        // backstop.
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let category: Option<EventCategory> =
            sqlx::query_scalar("SELECT category FROM events WHERE id = ?")
                .bind(event_id)
                .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        let category = category
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

        let previous = sqlx::query_as::<_, ParticipationRecord>(
            "SELECT event_id, user_id, status, note FROM participants WHERE event_id = ? AND user_id = ?"
        )
            .bind(event_id).bind(user_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        let current = sqlx::query_as::<_, ParticipationRecord>(
            "INSERT INTO participants (event_id, user_id, status, note) VALUES (?, ?, ?, ?)
             ON CONFLICT (event_id, user_id) DO UPDATE SET status = excluded.status, note = excluded.note
             RETURNING event_id, user_id, status, note"
        )
            .bind(event_id).bind(user_id).bind(status).bind(&note)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        let old_label = previous
            .as_ref()
            .map(|p| vocabulary.display_label(p.status, category))
            .unwrap_or(UNSET_LABEL);
        let new_label = vocabulary.display_label(status, category);

        sqlx::query(
            "INSERT INTO history (event_id, user_id, old_status, new_status, old_note, new_note, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(event_id).bind(user_id)
            .bind(old_label).bind(new_label)
            .bind(previous.as_ref().and_then(|p| p.note.as_deref()))
            .bind(&note)
            .bind(Utc::now())
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok((previous, current))
    }
}
