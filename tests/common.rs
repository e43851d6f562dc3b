use attendance_backend::{
    api::router::create_router,
    config::Config,
    domain::models::event::{EventCategory, NewEvent},
    domain::models::settings::AppSettings,
    domain::ports::{ChatGateway, EventRepository, SettingsRepository},
    error::AppError,
    infra::repositories::{
        sqlite_event_repo::SqliteEventRepo, sqlite_history_repo::SqliteHistoryRepo,
        sqlite_participation_repo::SqliteParticipationRepo,
        sqlite_settings_repo::SqliteSettingsRepo, sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Chat gateway double: records every outbound call, answers member
/// lookups from a fixed admin list.
pub struct MockChatGateway {
    pub admins: Vec<String>,
    pub messages: Mutex<Vec<(String, String)>>,
    pub published_views: Mutex<Vec<(String, Value)>>,
    pub opened_modals: Mutex<Vec<(String, Value)>>,
    pub updated_modals: Mutex<Vec<(String, Value)>>,
    pub uploads: Mutex<Vec<(String, Vec<u8>, String)>>,
}

impl MockChatGateway {
    pub fn new(admins: Vec<String>) -> Self {
        Self {
            admins,
            messages: Mutex::new(Vec::new()),
            published_views: Mutex::new(Vec::new()),
            opened_modals: Mutex::new(Vec::new()),
            updated_modals: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn last_published_view(&self) -> Option<Value> {
        self.published_views.lock().unwrap().last().map(|(_, v)| v.clone())
    }

    pub fn messages_to(&self, user_id: &str) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(channel, _)| channel == user_id)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl ChatGateway for MockChatGateway {
    async fn publish_home(&self, user_id: &str, view: Value) -> Result<(), AppError> {
        self.published_views.lock().unwrap().push((user_id.to_string(), view));
        Ok(())
    }

    async fn open_modal(&self, trigger_id: &str, view: Value) -> Result<(), AppError> {
        self.opened_modals.lock().unwrap().push((trigger_id.to_string(), view));
        Ok(())
    }

    async fn update_modal(&self, view_id: &str, view: Value) -> Result<(), AppError> {
        self.updated_modals.lock().unwrap().push((view_id.to_string(), view));
        Ok(())
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<(), AppError> {
        self.messages.lock().unwrap().push((channel.to_string(), text.to_string()));
        Ok(())
    }

    async fn post_blocks(&self, channel: &str, text: &str, _blocks: Value) -> Result<(), AppError> {
        self.messages.lock().unwrap().push((channel.to_string(), text.to_string()));
        Ok(())
    }

    async fn user_name(&self, user_id: &str) -> Result<String, AppError> {
        Ok(format!("Name of {}", user_id))
    }

    async fn usergroup_members(&self, _group_id: &str) -> Result<Vec<String>, AppError> {
        Ok(self.admins.clone())
    }

    async fn list_usergroups(&self) -> Result<Vec<(String, String)>, AppError> {
        Ok(vec![("S_ADMIN".to_string(), "admins".to_string())])
    }

    async fn list_channels(&self) -> Result<Vec<(String, String)>, AppError> {
        Ok(vec![("C_EXPORT".to_string(), "exports".to_string())])
    }

    async fn channel_name(&self, _channel_id: &str) -> Result<String, AppError> {
        Ok("exports".to_string())
    }

    async fn upload_file(&self, filename: &str, content: &[u8], channel_id: &str) -> Result<(), AppError> {
        self.uploads
            .lock()
            .unwrap()
            .push((filename.to_string(), content.to_vec(), channel_id.to_string()));
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub chat: Arc<MockChatGateway>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_admins(Vec::new()).await
    }

    /// Builds an app whose mock gateway reports `admins` as the members of
    /// every usergroup; when non-empty, an admin group is configured so
    /// `is_admin` resolves against it.
    pub async fn with_admins(admins: Vec<String>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            slack_token: "test-token".to_string(),
            slack_api_url: "http://localhost".to_string(),
        };

        let mut settings = AppSettings::default();
        if !admins.is_empty() {
            settings.admin_group = Some("S_ADMIN".to_string());
        }
        let settings_repo = Arc::new(SqliteSettingsRepo::new(pool.clone()));
        settings_repo.save(&settings).await.expect("Failed to seed settings");

        let chat = Arc::new(MockChatGateway::new(admins));

        let state = Arc::new(AppState::new(
            config,
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteParticipationRepo::new(pool.clone())),
            Arc::new(SqliteHistoryRepo::new(pool.clone())),
            settings_repo,
            chat.clone(),
            settings,
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            chat,
        }
    }

    /// Seeds an event through the real repository, hours relative to now.
    pub async fn seed_event(
        &self,
        name: &str,
        category: EventCategory,
        start_in_hours: i64,
        lock_in_hours: i64,
    ) -> attendance_backend::domain::models::event::Event {
        let start: DateTime<Utc> = Utc::now() + Duration::hours(start_in_hours);
        let event = NewEvent {
            name: name.to_string(),
            start_time: start,
            end_time: start + Duration::hours(2),
            lock_time: Utc::now() + Duration::hours(lock_in_hours),
            category,
            address: None,
        };
        self.state.event_repo.create(&event).await.expect("Failed to seed event")
    }
}

#[allow(dead_code)]
impl TestApp {
    /// Posts an interactivity callback the way the platform delivers it:
    /// form-encoded with the JSON document in the `payload` field.
    pub async fn post_interaction(&self, payload: &Value) -> axum::response::Response {
        use axum::{body::Body, http::{header, Request}};
        use tower::ServiceExt;

        let body = serde_urlencoded::to_string([("payload", payload.to_string())]).unwrap();
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/slack/interactions")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn post_event_callback(&self, payload: &Value) -> axum::response::Response {
        use axum::{body::Body, http::{header, Request}};
        use tower::ServiceExt;

        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/slack/events")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

#[allow(dead_code)]
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
