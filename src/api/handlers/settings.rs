use tracing::info;

use crate::api::payload::ViewState;
use crate::api::views;
use crate::api::views::settings::selected_id;
use crate::domain::models::event::EventFilter;
use crate::domain::models::settings::AppSettings;
use crate::error::AppError;
use crate::state::AppState;

pub async fn render_settings(state: &AppState, user_id: &str) -> Result<(), AppError> {
    let usergroups = state.chat.list_usergroups().await?;
    let channels = state.chat.list_channels().await?;
    let view = views::settings::settings_view(&state.settings(), &usergroups, &channels);
    state.chat.publish_home(user_id, view).await
}

/// Persists the settings form, then swaps the in-memory snapshot in one
/// step so concurrent readers never see a partial update.
pub async fn save_settings(state: &AppState, user_id: &str, view_state: &ViewState) -> Result<(), AppError> {
    let current = state.settings();
    let mut settings = AppSettings::clone(&current);

    settings.admin_group = view_state
        .selected("admin_group_block", "admin_group_select")
        .map(selected_id)
        .unwrap_or(settings.admin_group);
    settings.open_players_group = view_state
        .selected("open_players_block", "open_players_select")
        .map(selected_id)
        .unwrap_or(settings.open_players_group);
    settings.women_players_group = view_state
        .selected("women_players_block", "women_players_select")
        .map(selected_id)
        .unwrap_or(settings.women_players_group);
    settings.export_channel = view_state
        .selected("export_channel_block", "export_channel_select")
        .map(selected_id)
        .unwrap_or(settings.export_channel);

    let label = |block: &str, action: &str, fallback: &str| {
        view_state
            .text(block, action)
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    };
    settings.general_labels.coming =
        label("coming_text_block", "coming_text_input", &current.general_labels.coming);
    settings.general_labels.late =
        label("late_text_block", "late_text_input", &current.general_labels.late);
    settings.general_labels.not_coming =
        label("notcoming_text_block", "notcoming_text_input", &current.general_labels.not_coming);
    settings.training_labels.coming =
        label("coming_training_block", "coming_training_input", &current.training_labels.coming);
    settings.training_labels.late =
        label("late_training_block", "late_training_input", &current.training_labels.late);
    settings.training_labels.not_coming = label(
        "notcoming_training_block",
        "notcoming_training_input",
        &current.training_labels.not_coming,
    );

    state.settings_repo.save(&settings).await?;
    state.install_settings(settings);
    info!("Settings saved by {}", user_id);

    state.chat.post_message(user_id, "Settings were saved.").await?;
    crate::api::handlers::attendance::render_home(state, user_id, 0, EventFilter::All).await
}
