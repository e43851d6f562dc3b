mod common;

use attendance_backend::api::actions::{DeleteTarget, StatusTarget};
use attendance_backend::domain::models::event::{EventCategory, EventFilter};
use attendance_backend::domain::models::participation::AttendanceStatus;
use attendance_backend::domain::ports::{
    EventRepository, HistoryRepository, ParticipationRepository, UserRepository,
};
use attendance_backend::domain::services::paging::{encode_value, NavToken};
use axum::http::StatusCode;
use common::{response_json, TestApp};
use serde_json::json;

fn block_action(user: &str, action_id: &str, value: &str, note_block: Option<(&str, &str, &str)>) -> serde_json::Value {
    let mut values = json!({});
    if let Some((block, action, text)) = note_block {
        values[block] = json!({ action: { "value": text } });
    }
    json!({
        "type": "block_actions",
        "user": { "id": user },
        "trigger_id": "trigger.1",
        "container": { "view_id": "V1" },
        "view": {
            "id": "V1",
            "callback_id": "home",
            "private_metadata": "",
            "state": { "values": values },
        },
        "actions": [{ "action_id": action_id, "value": value }],
    })
}

#[tokio::test]
async fn url_verification_echoes_the_challenge() {
    let app = TestApp::new().await;
    let response = app
        .post_event_callback(&json!({ "type": "url_verification", "challenge": "c-123" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["challenge"], "c-123");
}

#[tokio::test]
async fn home_opened_creates_the_user_and_publishes_the_list() {
    let app = TestApp::new().await;
    let event = app.seed_event("Thursday practice", EventCategory::Training, 48, 24).await;

    let response = app
        .post_event_callback(&json!({
            "type": "event_callback",
            "event": { "type": "app_home_opened", "user": "U1", "tab": "home" },
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let user = app.state.user_repo.find_by_id("U1").await.unwrap().unwrap();
    assert_eq!(user.name, "Name of U1");

    let view = app.chat.last_published_view().expect("home view published");
    assert!(view.to_string().contains(&event.name));
}

#[tokio::test]
async fn status_button_records_attendance_with_the_note() {
    let app = TestApp::new().await;
    let event = app.seed_event("Practice", EventCategory::Training, 48, 24).await;
    app.state.user_repo.ensure("U1", "Alice").await.unwrap();

    let target = StatusTarget { event_id: event.id, page: 0, filter: EventFilter::All };
    let note_block = format!("note_{}", event.id);
    let note_action = format!("note_input_{}", event.id);
    let payload = block_action(
        "U1",
        "attendance_coming",
        &encode_value(&target),
        Some((&note_block, &note_action, " car pool ")),
    );

    let response = app.post_interaction(&payload).await;
    assert_eq!(response.status(), StatusCode::OK);

    let record = app.state.participation_repo.get(event.id, "U1").await.unwrap().unwrap();
    assert_eq!(record.status, AttendanceStatus::Coming);
    assert_eq!(record.note.as_deref(), Some("car pool"));

    // The same (page, filter) position is re-rendered.
    assert!(app.chat.last_published_view().is_some());
}

#[tokio::test]
async fn locked_event_rejects_the_submission_with_a_dm() {
    let app = TestApp::new().await;
    let event = app.seed_event("Practice", EventCategory::Training, 48, -1).await;
    app.state.user_repo.ensure("U1", "Alice").await.unwrap();

    let target = StatusTarget { event_id: event.id, page: 0, filter: EventFilter::All };
    let payload = block_action("U1", "attendance_late", &encode_value(&target), None);
    app.post_interaction(&payload).await;

    assert!(app.state.participation_repo.get(event.id, "U1").await.unwrap().is_none());
    assert!(app.state.history_repo.list_by_event(event.id).await.unwrap().is_empty());

    let messages = app.chat.messages_to("U1");
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("deadline"));
}

#[tokio::test]
async fn stale_next_page_token_renders_an_empty_page_without_error() {
    let app = TestApp::new().await;
    app.seed_event("Practice", EventCategory::Training, 48, 24).await;

    let token = NavToken::EventList { page: 7, filter: EventFilter::All };
    let payload = block_action("U1", "attendance_page", &token.encode(), None);
    let response = app.post_interaction(&payload).await;
    assert_eq!(response.status(), StatusCode::OK);

    // No error DM; a page was rendered, with no next-page control on it.
    assert!(app.chat.messages_to("U1").is_empty());
    let view = app.chat.last_published_view().unwrap().to_string();
    assert!(!view.contains("Next page"));
}

#[tokio::test]
async fn pagination_controls_follow_the_item_count() {
    let app = TestApp::new().await;
    for i in 0..11 {
        app.seed_event(&format!("Practice {}", i), EventCategory::Training, 24 + i, 12).await;
    }

    let first = NavToken::EventList { page: 0, filter: EventFilter::All };
    app.post_interaction(&block_action("U1", "attendance_page", &first.encode(), None)).await;
    let view = app.chat.last_published_view().unwrap().to_string();
    assert!(view.contains("Next page"));
    assert!(!view.contains("Previous page"));

    let second = NavToken::EventList { page: 1, filter: EventFilter::All };
    app.post_interaction(&block_action("U1", "attendance_page", &second.encode(), None)).await;
    let view = app.chat.last_published_view().unwrap().to_string();
    assert!(!view.contains("Next page"));
    assert!(view.contains("Previous page"));
}

#[tokio::test]
async fn non_admins_cannot_delete_events() {
    let app = TestApp::new().await;
    let event = app.seed_event("Practice", EventCategory::Training, 48, 24).await;

    let target = DeleteTarget { event_id: event.id, page: 0 };
    app.post_interaction(&block_action("U1", "delete_event", &encode_value(&target), None)).await;

    assert!(app.state.event_repo.find_by_id(event.id).await.unwrap().is_some());
    let messages = app.chat.messages_to("U1");
    assert!(messages.iter().any(|m| m.contains("restricted")));
}

#[tokio::test]
async fn admins_can_delete_events() {
    let app = TestApp::with_admins(vec!["UADMIN".to_string()]).await;
    let event = app.seed_event("Practice", EventCategory::Training, 48, 24).await;

    let target = DeleteTarget { event_id: event.id, page: 0 };
    app.post_interaction(&block_action("UADMIN", "delete_event", &encode_value(&target), None)).await;

    assert!(app.state.event_repo.find_by_id(event.id).await.unwrap().is_none());
    let messages = app.chat.messages_to("UADMIN");
    assert!(messages.iter().any(|m| m.contains("deleted")));
}

#[tokio::test]
async fn filter_submission_resets_to_page_zero_of_the_filtered_list() {
    let app = TestApp::new().await;
    let training = app.seed_event("Practice", EventCategory::Training, 48, 24).await;
    let tournament = app.seed_event("Spring cup", EventCategory::Tournament, 48, 24).await;

    let payload = json!({
        "type": "view_submission",
        "user": { "id": "U1" },
        "view": {
            "id": "V1",
            "callback_id": "filter_submit",
            "private_metadata": "",
            "state": { "values": {
                "filter_block": { "filter_choice": { "selected_option": { "value": "training" } } },
            }},
        },
    });
    app.post_interaction(&payload).await;

    let view = app.chat.last_published_view().unwrap().to_string();
    assert!(view.contains(&training.name));
    assert!(!view.contains(&tournament.name));
}

#[tokio::test]
async fn duplicate_submission_creates_weekly_copies() {
    let app = TestApp::with_admins(vec!["UADMIN".to_string()]).await;
    let original = app.seed_event("Practice", EventCategory::Training, 48, 24).await;

    let payload = json!({
        "type": "view_submission",
        "user": { "id": "UADMIN" },
        "view": {
            "id": "V1",
            "callback_id": "duplicate_event",
            "private_metadata": original.id.to_string(),
            "state": { "values": {
                "count_block": { "count_input": { "value": "3" } },
            }},
        },
    });
    app.post_interaction(&payload).await;

    let events = app.state.event_repo.list_upcoming(EventFilter::All).await.unwrap();
    assert_eq!(events.len(), 4);
    for (i, event) in events.iter().enumerate() {
        let expected = original.start_time + chrono::Duration::weeks(i as i64);
        assert_eq!(event.start_time, expected);
        assert_eq!(event.name, original.name);
    }
}

#[tokio::test]
async fn duplicate_submission_rejects_an_out_of_range_count_in_the_modal() {
    let app = TestApp::with_admins(vec!["UADMIN".to_string()]).await;
    let original = app.seed_event("Practice", EventCategory::Training, 48, 24).await;

    let payload = json!({
        "type": "view_submission",
        "user": { "id": "UADMIN" },
        "view": {
            "id": "V1",
            "callback_id": "duplicate_event",
            "private_metadata": original.id.to_string(),
            "state": { "values": {
                "count_block": { "count_input": { "value": "53" } },
            }},
        },
    });
    let response = app.post_interaction(&payload).await;
    let body = response_json(response).await;
    assert_eq!(body["response_action"], "errors");
    assert!(body["errors"]["count_block"].is_string());

    let events = app.state.event_repo.list_upcoming(EventFilter::All).await.unwrap();
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn chat_attendance_submission_runs_the_ledger_path() {
    let app = TestApp::new().await;
    let event = app.seed_event("Practice", EventCategory::Training, 48, 24).await;
    app.state.user_repo.ensure("U1", "Alice").await.unwrap();

    let payload = json!({
        "type": "view_submission",
        "user": { "id": "U1" },
        "view": {
            "id": "V1",
            "callback_id": "chat_attendance",
            "private_metadata": event.id.to_string(),
            "state": { "values": {
                "status_block": { "status_choice": { "selected_option": { "value": "Late" } } },
                "note_block": { "note_input": { "value": "bus delay" } },
            }},
        },
    });
    app.post_interaction(&payload).await;

    let record = app.state.participation_repo.get(event.id, "U1").await.unwrap().unwrap();
    assert_eq!(record.status, AttendanceStatus::Late);
    assert_eq!(record.note.as_deref(), Some("bus delay"));
    assert_eq!(app.state.history_repo.list_by_event(event.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn mass_insert_touches_only_unlocked_trainings_in_the_window() {
    let app = TestApp::new().await;
    let open = app.seed_event("Open training", EventCategory::Training, 48, 24).await;
    let locked = app.seed_event("Locked training", EventCategory::Training, 48, -1).await;
    let tournament = app.seed_event("Cup", EventCategory::Tournament, 48, 24).await;
    app.state.user_repo.ensure("U1", "Alice").await.unwrap();

    let payload = json!({
        "type": "view_submission",
        "user": { "id": "U1" },
        "view": {
            "id": "V1",
            "callback_id": "mass_insert",
            "private_metadata": "",
            "state": { "values": {
                "status_block": { "status_choice": { "selected_option": { "value": "Coming" } } },
                "note_block": { "note_input": { "value": "whole month" } },
            }},
        },
    });
    app.post_interaction(&payload).await;

    assert!(app.state.participation_repo.get(open.id, "U1").await.unwrap().is_some());
    assert!(app.state.participation_repo.get(locked.id, "U1").await.unwrap().is_none());
    assert!(app.state.participation_repo.get(tournament.id, "U1").await.unwrap().is_none());
}

#[tokio::test]
async fn admin_status_override_skips_the_lock_check() {
    let app = TestApp::with_admins(vec!["UADMIN".to_string()]).await;
    let event = app.seed_event("Practice", EventCategory::Training, 48, -1).await;
    app.state.user_repo.ensure("U9", "Bob").await.unwrap();

    let target = attendance_backend::api::actions::EditStatusTarget {
        event_id: event.id,
        user_id: "U9".to_string(),
    };
    let payload = block_action("UADMIN", "edit_status_not_coming", &encode_value(&target), None);
    app.post_interaction(&payload).await;

    let record = app.state.participation_repo.get(event.id, "U9").await.unwrap().unwrap();
    assert_eq!(record.status, AttendanceStatus::NotComing);
    assert_eq!(app.state.history_repo.list_by_event(event.id).await.unwrap().len(), 1);
}
