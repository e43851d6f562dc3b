mod common;

use attendance_backend::domain::models::event::EventCategory;
use attendance_backend::domain::models::participation::AttendanceStatus;
use attendance_backend::domain::models::settings::AppSettings;
use attendance_backend::domain::ports::{
    ParticipationRepository, SettingsRepository, UserRepository,
};
use common::{response_json, TestApp};
use serde_json::json;

async fn configure_export_channel(app: &TestApp) {
    let mut settings = AppSettings::clone(&app.state.settings());
    settings.export_channel = Some("C_EXPORT".to_string());
    app.state.settings_repo.save(&settings).await.unwrap();
    app.state.install_settings(settings);
}

fn export_submission(start: &str, end: &str) -> serde_json::Value {
    json!({
        "type": "view_submission",
        "user": { "id": "UADMIN" },
        "view": {
            "id": "V1",
            "callback_id": "export_dates",
            "private_metadata": "",
            "state": { "values": {
                "start_date_block": { "start_date_select": { "selected_date": start } },
                "end_date_block": { "end_date_select": { "selected_date": end } },
            }},
        },
    })
}

#[tokio::test]
async fn export_uploads_a_csv_and_confirms_by_dm() {
    let app = TestApp::with_admins(vec!["UADMIN".to_string()]).await;
    configure_export_channel(&app).await;

    let event = app.seed_event("Practice", EventCategory::Training, 48, 24).await;
    app.state.user_repo.ensure("U1", "Alice").await.unwrap();
    let vocab = app.state.vocabulary();
    app.state
        .participation_repo
        .upsert(event.id, "U1", AttendanceStatus::Coming, Some("car pool"), &vocab)
        .await
        .unwrap();

    let start = chrono::Utc::now().date_naive().to_string();
    let end = (chrono::Utc::now() + chrono::Duration::days(7)).date_naive().to_string();
    app.post_interaction(&export_submission(&start, &end)).await;

    let uploads = app.chat.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    let (filename, content, channel) = &uploads[0];
    assert!(filename.starts_with("attendance_"));
    assert_eq!(channel, "C_EXPORT");

    let csv = String::from_utf8(content.clone()).unwrap();
    assert!(csv.starts_with("name,status,note,event_name,start_time,end_time"));
    assert!(csv.contains("Alice,Coming,car pool,Practice"));

    let messages = app.chat.messages_to("UADMIN");
    assert!(messages.iter().any(|m| m.contains("#exports")));
}

#[tokio::test]
async fn reversed_date_range_is_rejected_inside_the_modal() {
    let app = TestApp::with_admins(vec!["UADMIN".to_string()]).await;
    configure_export_channel(&app).await;

    let response = app
        .post_interaction(&export_submission("2025-06-30", "2025-06-01"))
        .await;
    let body = response_json(response).await;
    assert_eq!(body["response_action"], "errors");

    assert!(app.chat.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn export_without_a_configured_channel_reports_a_validation_error() {
    let app = TestApp::with_admins(vec!["UADMIN".to_string()]).await;

    app.post_interaction(&export_submission("2025-06-01", "2025-06-30")).await;

    assert!(app.chat.uploads.lock().unwrap().is_empty());
    let messages = app.chat.messages_to("UADMIN");
    assert!(messages.iter().any(|m| m.contains("export channel")));
}
