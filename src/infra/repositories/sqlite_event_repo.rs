use crate::domain::models::event::{Event, EventCategory, EventFilter, NewEvent};
use crate::domain::ports::EventRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &NewEvent) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (name, start_time, end_time, lock_time, category, address)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&event.name).bind(event.start_time).bind(event.end_time)
            .bind(event.lock_time).bind(event.category).bind(&event.address)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_upcoming(&self, filter: EventFilter) -> Result<Vec<Event>, AppError> {
        match filter.category() {
            Some(category) => {
                sqlx::query_as::<_, Event>(
                    "SELECT * FROM events WHERE end_time > ? AND category = ? ORDER BY start_time ASC"
                )
                    .bind(Utc::now()).bind(category)
                    .fetch_all(&self.pool).await.map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, Event>(
                    "SELECT * FROM events WHERE end_time > ? ORDER BY start_time ASC"
                )
                    .bind(Utc::now())
                    .fetch_all(&self.pool).await.map_err(AppError::Database)
            }
        }
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE date(start_time) = ? ORDER BY start_time ASC"
        )
            .bind(date)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_unlocked_trainings(&self, now: DateTime<Utc>, until: NaiveDate) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events
             WHERE category = ? AND lock_time > ? AND date(start_time) <= ?
             ORDER BY start_time ASC"
        )
            .bind(EventCategory::Training).bind(now).bind(until)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_details(
        &self,
        id: i64,
        name: &str,
        category: EventCategory,
        address: Option<&str>,
        lock_time: DateTime<Utc>,
    ) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET name = ?, category = ?, address = ?, lock_time = ? WHERE id = ? RETURNING *"
        )
            .bind(name).bind(category).bind(address).bind(lock_time).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        // Cascade: participation and history rows go with the event, in one
        // transaction.
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM participants WHERE event_id = ?")
            .bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM history WHERE event_id = ?")
            .bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
