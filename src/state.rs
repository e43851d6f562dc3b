use std::sync::{Arc, RwLock};

use crate::config::Config;
use crate::domain::models::settings::AppSettings;
use crate::domain::ports::{
    ChatGateway, EventRepository, HistoryRepository, ParticipationRepository,
    SettingsRepository, UserRepository,
};
use crate::domain::services::vocabulary::StatusVocabulary;
use crate::error::AppError;

pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub participation_repo: Arc<dyn ParticipationRepository>,
    pub history_repo: Arc<dyn HistoryRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub chat: Arc<dyn ChatGateway>,
    settings: RwLock<Arc<AppSettings>>,
}

impl AppState {
    pub fn new(
        config: Config,
        event_repo: Arc<dyn EventRepository>,
        user_repo: Arc<dyn UserRepository>,
        participation_repo: Arc<dyn ParticipationRepository>,
        history_repo: Arc<dyn HistoryRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        chat: Arc<dyn ChatGateway>,
        settings: AppSettings,
    ) -> Self {
        Self {
            config,
            event_repo,
            user_repo,
            participation_repo,
            history_repo,
            settings_repo,
            chat,
            settings: RwLock::new(Arc::new(settings)),
        }
    }

    /// Current settings snapshot. Holders keep a consistent view even while
    /// a save or reload swaps the snapshot underneath them.
    pub fn settings(&self) -> Arc<AppSettings> {
        self.settings.read().expect("settings lock poisoned").clone()
    }

    /// Installs a new snapshot in one swap; readers see either the old or
    /// the new settings, never a mix.
    pub fn install_settings(&self, settings: AppSettings) {
        *self.settings.write().expect("settings lock poisoned") = Arc::new(settings);
    }

    /// Re-reads the settings table and swaps the snapshot.
    pub async fn reload_settings(&self) -> Result<(), AppError> {
        let settings = self.settings_repo.load().await?;
        self.install_settings(settings);
        Ok(())
    }

    pub fn vocabulary(&self) -> StatusVocabulary {
        StatusVocabulary::from_settings(&self.settings())
    }

    /// Admins are the members of the configured admin usergroup; with no
    /// group configured nobody is an admin.
    pub async fn is_admin(&self, user_id: &str) -> Result<bool, AppError> {
        let Some(group) = self.settings().admin_group.clone() else {
            return Ok(false);
        };
        let members = self.chat.usergroup_members(&group).await?;
        Ok(members.iter().any(|m| m == user_id))
    }
}
