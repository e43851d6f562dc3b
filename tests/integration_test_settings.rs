mod common;

use attendance_backend::domain::models::event::EventCategory;
use attendance_backend::domain::models::participation::AttendanceStatus;
use attendance_backend::domain::models::settings::AppSettings;
use attendance_backend::domain::ports::SettingsRepository;
use attendance_backend::infra::repositories::sqlite_settings_repo::SqliteSettingsRepo;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn settings_survive_a_save_load_round_trip() {
    let app = TestApp::new().await;
    let repo = SqliteSettingsRepo::new(app.pool.clone());

    let mut settings = AppSettings::default();
    settings.admin_group = Some("S_ADMIN".to_string());
    settings.export_channel = Some("C_EXPORT".to_string());
    settings.training_labels.late = "Running late".to_string();

    repo.save(&settings).await.unwrap();
    assert_eq!(repo.load().await.unwrap(), settings);

    // Saving again overwrites rather than duplicating keys.
    settings.training_labels.late = "Delayed".to_string();
    repo.save(&settings).await.unwrap();
    assert_eq!(repo.load().await.unwrap(), settings);
}

#[tokio::test]
async fn reload_swaps_the_snapshot_atomically() {
    let app = TestApp::new().await;

    let before = app.state.settings();
    let mut updated = AppSettings::clone(&before);
    updated.general_labels.coming = "In".to_string();
    app.state.settings_repo.save(&updated).await.unwrap();

    // The held snapshot stays consistent until the reload swaps it.
    assert_eq!(app.state.settings().general_labels.coming, before.general_labels.coming);
    app.state.reload_settings().await.unwrap();
    assert_eq!(app.state.settings().general_labels.coming, "In");

    // New vocabulary lookups see the new labels.
    let vocab = app.state.vocabulary();
    assert_eq!(vocab.display_label(AttendanceStatus::Coming, EventCategory::Other), "In");
}

#[tokio::test]
async fn saving_settings_through_the_form_updates_labels_and_bindings() {
    let app = TestApp::with_admins(vec!["UADMIN".to_string()]).await;

    let payload = json!({
        "type": "block_actions",
        "user": { "id": "UADMIN" },
        "trigger_id": "trigger.1",
        "container": { "view_id": "V1" },
        "view": {
            "id": "V1",
            "callback_id": "settings",
            "private_metadata": "",
            "state": { "values": {
                "admin_group_block": { "admin_group_select": { "selected_option": { "value": "S_ADMIN" } } },
                "open_players_block": { "open_players_select": { "selected_option": { "value": "none" } } },
                "women_players_block": { "women_players_select": { "selected_option": { "value": "none" } } },
                "export_channel_block": { "export_channel_select": { "selected_option": { "value": "C_EXPORT" } } },
                "coming_text_block": { "coming_text_input": { "value": "In" } },
                "late_text_block": { "late_text_input": { "value": "Maybe" } },
                "notcoming_text_block": { "notcoming_text_input": { "value": "Out" } },
                "coming_training_block": { "coming_training_input": { "value": "Will be there" } },
                "late_training_block": { "late_training_input": { "value": "Running late" } },
                "notcoming_training_block": { "notcoming_training_input": { "value": "Skipping" } },
            }},
        },
        "actions": [{ "action_id": "save_settings", "value": "save" }],
    });
    app.post_interaction(&payload).await;

    let snapshot = app.state.settings();
    assert_eq!(snapshot.export_channel.as_deref(), Some("C_EXPORT"));
    assert_eq!(snapshot.open_players_group, None);
    assert_eq!(snapshot.general_labels.coming, "In");
    assert_eq!(snapshot.training_labels.not_coming, "Skipping");

    // Persisted too, not just swapped in memory.
    let stored = app.state.settings_repo.load().await.unwrap();
    assert_eq!(stored, AppSettings::clone(&snapshot));

    let messages = app.chat.messages_to("UADMIN");
    assert!(messages.iter().any(|m| m.contains("saved")));
}

#[tokio::test]
async fn non_admins_cannot_save_settings() {
    let app = TestApp::with_admins(vec!["UADMIN".to_string()]).await;
    let before = app.state.settings_repo.load().await.unwrap();

    let payload = json!({
        "type": "block_actions",
        "user": { "id": "U1" },
        "trigger_id": "trigger.1",
        "view": {
            "id": "V1",
            "callback_id": "settings",
            "private_metadata": "",
            "state": { "values": {
                "coming_text_block": { "coming_text_input": { "value": "Hacked" } },
            }},
        },
        "actions": [{ "action_id": "save_settings", "value": "save" }],
    });
    app.post_interaction(&payload).await;

    assert_eq!(app.state.settings_repo.load().await.unwrap(), before);
}
