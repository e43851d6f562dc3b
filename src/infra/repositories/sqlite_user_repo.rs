use crate::domain::models::user::{User, UserCategory};
use crate::domain::ports::UserRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn ensure(&self, user_id: &str, name: &str) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (user_id, name) VALUES (?, ?)
             ON CONFLICT (user_id) DO UPDATE SET name = excluded.name"
        )
            .bind(user_id).bind(name)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY name ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_category(&self, user_id: &str, category: UserCategory) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET category = ? WHERE user_id = ?")
            .bind(category).bind(user_id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }
}
