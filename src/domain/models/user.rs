use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// Player grouping used by the missing-players view. Unset until an admin
/// assigns one; not required for attendance itself.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
pub enum UserCategory {
    Open,
    Women,
}

impl UserCategory {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "Open" => Ok(UserCategory::Open),
            "Women" => Ok(UserCategory::Women),
            other => Err(AppError::Validation(format!("Unknown user category: {}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserCategory::Open => "Open",
            UserCategory::Women => "Women",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub category: Option<UserCategory>,
}
