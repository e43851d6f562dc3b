use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::SettingsRepository;
use crate::infra::repositories::{
    sqlite_event_repo::SqliteEventRepo, sqlite_history_repo::SqliteHistoryRepo,
    sqlite_participation_repo::SqliteParticipationRepo,
    sqlite_settings_repo::SqliteSettingsRepo, sqlite_user_repo::SqliteUserRepo,
};
use crate::infra::slack::http_chat_gateway::HttpChatGateway;
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_sqlite_migrations(&pool).await;

    let chat = Arc::new(HttpChatGateway::new(
        config.slack_api_url.clone(),
        config.slack_token.clone(),
    ));

    let settings_repo = Arc::new(SqliteSettingsRepo::new(pool.clone()));
    let settings = settings_repo
        .load()
        .await
        .expect("Failed to load settings");

    AppState::new(
        config.clone(),
        Arc::new(SqliteEventRepo::new(pool.clone())),
        Arc::new(SqliteUserRepo::new(pool.clone())),
        Arc::new(SqliteParticipationRepo::new(pool.clone())),
        Arc::new(SqliteHistoryRepo::new(pool.clone())),
        settings_repo,
        chat,
        settings,
    )
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
