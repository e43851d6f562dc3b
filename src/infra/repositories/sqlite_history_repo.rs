use crate::domain::models::history::HistoryEntry;
use crate::domain::ports::HistoryRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteHistoryRepo {
    pool: SqlitePool,
}

impl SqliteHistoryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for SqliteHistoryRepo {
    async fn list_by_event(&self, event_id: i64) -> Result<Vec<HistoryEntry>, AppError> {
        // The id tie-break keeps same-second entries in a stable order so
        // page slicing stays consistent while browsing.
        sqlx::query_as::<_, HistoryEntry>(
            "SELECT h.event_id, h.user_id, u.name AS user_name,
                    h.old_status, h.new_status, h.old_note, h.new_note, h.timestamp
             FROM history h
             JOIN users u ON u.user_id = h.user_id
             WHERE h.event_id = ?
             ORDER BY h.timestamp DESC, h.id DESC"
        )
            .bind(event_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
