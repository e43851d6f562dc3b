use crate::domain::models::settings::AppSettings;
use crate::domain::ports::SettingsRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteSettingsRepo {
    pool: SqlitePool,
}

impl SqliteSettingsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepo {
    async fn load(&self) -> Result<AppSettings, AppError> {
        let rows = sqlx::query("SELECT key, value FROM settings")
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;
        let pairs = rows
            .into_iter()
            .map(|row| (row.get::<String, _>("key"), row.get::<String, _>("value")));
        Ok(AppSettings::from_pairs(pairs))
    }

    async fn save(&self, settings: &AppSettings) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        for (key, value) in settings.to_pairs() {
            sqlx::query(
                "INSERT INTO settings (key, value) VALUES (?, ?)
                 ON CONFLICT (key) DO UPDATE SET value = excluded.value"
            )
                .bind(key).bind(value)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
