mod common;

use attendance_backend::domain::models::event::EventCategory;
use attendance_backend::domain::models::participation::AttendanceStatus;
use attendance_backend::domain::ports::{HistoryRepository, ParticipationRepository, UserRepository};
use common::TestApp;
use sqlx::Row;
use tokio::task::JoinSet;

/// Concurrent submissions for the same (event, user) pair must leave
/// exactly one ledger row (last committed wins) and one history entry per
/// successful write, never a constraint violation or a lost update.
#[tokio::test]
async fn concurrent_upserts_on_one_key_keep_ledger_and_history_consistent() {
    let app = TestApp::new().await;
    let event = app.seed_event("Practice", EventCategory::Training, 48, 24).await;
    app.state.user_repo.ensure("U1", "Alice").await.unwrap();

    let writer_count = 10;
    let mut set = JoinSet::new();

    for i in 0..writer_count {
        let participation = app.state.participation_repo.clone();
        let vocab = app.state.vocabulary();
        let event_id = event.id;
        set.spawn(async move {
            let status = if i % 2 == 0 { AttendanceStatus::Coming } else { AttendanceStatus::Late };
            let note = format!("writer {}", i);
            participation
                .upsert(event_id, "U1", status, Some(&note), &vocab)
                .await
                .expect("upsert must not fail under contention")
        });
    }

    while let Some(res) = set.join_next().await {
        res.unwrap();
    }

    let rows = sqlx::query("SELECT COUNT(*) AS count FROM participants WHERE event_id = ?")
        .bind(event.id)
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(rows.get::<i64, _>("count"), 1, "ledger must hold exactly one row per key");

    let stored = app.state.participation_repo.get(event.id, "U1").await.unwrap().unwrap();
    assert!(matches!(stored.status, AttendanceStatus::Coming | AttendanceStatus::Late));

    let history = app.state.history_repo.list_by_event(event.id).await.unwrap();
    assert_eq!(history.len(), writer_count, "one history entry per successful write");

    // Exactly one entry is the first-ever submission.
    let first_entries = history.iter().filter(|h| h.old_status == "Unset").count();
    assert_eq!(first_entries, 1);
}

/// Concurrent submissions by different users never interfere with each
/// other's rows.
#[tokio::test]
async fn concurrent_upserts_across_users_land_independently() {
    let app = TestApp::new().await;
    let event = app.seed_event("Practice", EventCategory::Training, 48, 24).await;

    let user_count = 8;
    for i in 0..user_count {
        app.state
            .user_repo
            .ensure(&format!("U{}", i), &format!("Player {}", i))
            .await
            .unwrap();
    }

    let mut set = JoinSet::new();
    for i in 0..user_count {
        let participation = app.state.participation_repo.clone();
        let vocab = app.state.vocabulary();
        let event_id = event.id;
        set.spawn(async move {
            participation
                .upsert(event_id, &format!("U{}", i), AttendanceStatus::Coming, None, &vocab)
                .await
                .expect("upsert must not fail under contention")
        });
    }
    while let Some(res) = set.join_next().await {
        res.unwrap();
    }

    let participants = app.state.participation_repo.list_by_event(event.id).await.unwrap();
    assert_eq!(participants.len(), user_count);
    assert!(participants.iter().all(|p| p.status == AttendanceStatus::Coming));
}
