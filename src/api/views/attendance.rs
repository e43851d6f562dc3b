use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::api::actions::{EventMenuChoice, EventMenuItem, StatusTarget};
use crate::api::views::{
    actions, button, divider, format_dt, day_short, header, home, modal, overflow, plain,
    section, text_input,
};
use crate::domain::models::event::{Event, EventCategory, EventFilter};
use crate::domain::models::participation::{AttendanceStatus, ParticipationRecord};
use crate::domain::services::paging::{encode_value, page_window, NavToken, EVENTS_PAGE_SIZE};
use crate::domain::services::vocabulary::StatusVocabulary;

fn category_line(category: EventCategory) -> String {
    let emoji = match category {
        EventCategory::Training => ":large_blue_square:",
        EventCategory::Tournament => ":large_red_square:",
        EventCategory::Other => ":large_yellow_square:",
    };
    format!("{} {}", emoji, category.as_str())
}

fn status_button(
    action_id: &str,
    status: AttendanceStatus,
    label: &str,
    emoji: &str,
    current: Option<AttendanceStatus>,
    target: &StatusTarget,
) -> Value {
    let selected = current == Some(status);
    let text = if selected { format!("{} {}", emoji, label) } else { label.to_string() };
    let mut b = button(&text, action_id, &encode_value(target));
    if selected {
        b["style"] = json!("primary");
    }
    b
}

fn event_menu(event_id: i64, groups_configured: bool) -> Value {
    let mut options = vec![
        ("Show participants".to_string(), encode_value(&EventMenuChoice { event_id, item: EventMenuItem::Participants })),
        ("Show details".to_string(), encode_value(&EventMenuChoice { event_id, item: EventMenuItem::Details })),
        ("Show history".to_string(), encode_value(&EventMenuChoice { event_id, item: EventMenuItem::History })),
    ];
    if groups_configured {
        options.push((
            "Show missing players".to_string(),
            encode_value(&EventMenuChoice { event_id, item: EventMenuItem::MissingPlayers }),
        ));
    }
    options.push((
        "Share event".to_string(),
        encode_value(&EventMenuChoice { event_id, item: EventMenuItem::Share }),
    ));
    overflow("event_menu", options)
}

/// Home tab: the paginated upcoming-events list with status buttons and a
/// note input per event.
pub fn home_view(
    events: &[Event],
    my_records: &[ParticipationRecord],
    vocabulary: &StatusVocabulary,
    is_admin: bool,
    groups_configured: bool,
    page: u32,
    filter: EventFilter,
    now: DateTime<Utc>,
) -> Value {
    let mut blocks = Vec::new();

    blocks.push(section(&format!("Updated: {}", format_dt(now))));

    let menu_options: Vec<(String, String)> = if is_admin {
        vec![
            ("Refresh".to_string(), "refresh".to_string()),
            ("Edit attendance".to_string(), "edit_attendance".to_string()),
            ("Edit settings".to_string(), "settings".to_string()),
            ("Manage events".to_string(), "manage_events".to_string()),
            ("Fill in bulk".to_string(), "mass_insert".to_string()),
        ]
    } else {
        vec![
            ("Fill in bulk".to_string(), "mass_insert".to_string()),
            ("Refresh".to_string(), "refresh".to_string()),
        ]
    };
    blocks.push(actions(vec![overflow("main_menu", menu_options)]));
    blocks.push(actions(vec![button("Filter", "open_filter", filter.as_str())]));
    blocks.push(header("Upcoming events"));

    let window = page_window(events.len(), page, EVENTS_PAGE_SIZE);
    for event in &events[window.start..window.end] {
        let record = my_records.iter().find(|r| r.event_id == event.id);
        let note = record.and_then(|r| r.note.as_deref()).unwrap_or("");
        let current = record.map(|r| r.status);
        let locked = if event.is_locked(now) { " - `Locked`" } else { "" };

        blocks.push(json!({
            "type": "section",
            "text": super::mrkdwn(&format!(
                "*{}*\n{} {}{}\n{}",
                event.name,
                day_short(event.start_time),
                format_dt(event.start_time),
                locked,
                category_line(event.category),
            )),
            "accessory": event_menu(event.id, groups_configured),
        }));

        blocks.push(section("*Attendance*"));

        let target = StatusTarget { event_id: event.id, page, filter };
        blocks.push(actions(vec![
            status_button(
                "attendance_coming",
                AttendanceStatus::Coming,
                vocabulary.display_label(AttendanceStatus::Coming, event.category),
                "🟢",
                current,
                &target,
            ),
            status_button(
                "attendance_late",
                AttendanceStatus::Late,
                vocabulary.display_label(AttendanceStatus::Late, event.category),
                "🟡",
                current,
                &target,
            ),
            status_button(
                "attendance_not_coming",
                AttendanceStatus::NotComing,
                vocabulary.display_label(AttendanceStatus::NotComing, event.category),
                "🔴",
                current,
                &target,
            ),
        ]));

        blocks.push(text_input(
            &format!("note_{}", event.id),
            &format!("note_input_{}", event.id),
            "Reason / note",
            Some("Enter a reason or note..."),
            Some(note),
            true,
        ));
        blocks.push(divider());
    }

    let token = NavToken::EventList { page, filter };
    if window.has_next {
        blocks.push(actions(vec![button("Next page", "attendance_page", &token.next().encode())]));
    }
    if let Some(prev) = token.prev() {
        blocks.push(actions(vec![button("Previous page", "attendance_page", &prev.encode())]));
    }

    home(blocks)
}

/// Category-filter modal; the current filter is preselected.
pub fn filter_modal(current: EventFilter) -> Value {
    let options = [
        (EventFilter::All, "Show everything"),
        (EventFilter::Training, "Trainings"),
        (EventFilter::Tournament, "Tournaments"),
        (EventFilter::Other, "Other"),
    ];
    let rendered: Vec<Value> = options
        .iter()
        .map(|(filter, text)| json!({ "text": plain(text), "value": filter.as_str() }))
        .collect();
    let initial = options
        .iter()
        .find(|(filter, _)| *filter == current)
        .map(|(filter, text)| json!({ "text": plain(text), "value": filter.as_str() }))
        .expect("current filter is always an option");

    let blocks = vec![
        header("Set filter"),
        json!({
            "type": "input",
            "block_id": "filter_block",
            "element": {
                "type": "radio_buttons",
                "action_id": "filter_choice",
                "options": rendered,
                "initial_option": initial,
            },
            "label": plain("Event category"),
        }),
    ];
    modal("Set filter", "filter_submit", "", blocks, Some("Confirm"))
}

fn status_options(vocabulary: &StatusVocabulary, category: EventCategory) -> Vec<Value> {
    [AttendanceStatus::Coming, AttendanceStatus::Late, AttendanceStatus::NotComing]
        .iter()
        .map(|status| {
            json!({
                "text": plain(vocabulary.display_label(*status, category)),
                "value": status.as_canonical(),
            })
        })
        .collect()
}

/// Bulk-fill modal: one status plus a note, applied to every open training
/// in the upcoming window.
pub fn mass_insert_modal(vocabulary: &StatusVocabulary) -> Value {
    let blocks = vec![
        header("Fill trainings in bulk"),
        json!({
            "type": "input",
            "block_id": "status_block",
            "element": {
                "type": "radio_buttons",
                "action_id": "status_choice",
                "options": status_options(vocabulary, EventCategory::Training),
            },
            "label": plain("Attendance"),
        }),
        text_input("note_block", "note_input", "Reason / note", Some("Enter a reason or note..."), None, true),
    ];
    modal("Fill in bulk", "mass_insert", "", blocks, Some("Confirm"))
}

/// Attendance modal reached from a shared event message in a channel.
pub fn chat_attendance_modal(event: &Event, vocabulary: &StatusVocabulary) -> Value {
    let blocks = vec![
        section(&format!("*{}*\n{}", event.name, format_dt(event.start_time))),
        json!({
            "type": "input",
            "block_id": "status_block",
            "element": {
                "type": "radio_buttons",
                "action_id": "status_choice",
                "options": status_options(vocabulary, event.category),
            },
            "label": plain("Attendance"),
        }),
        text_input("note_block", "note_input", "Reason / note", Some("Enter a reason or note..."), None, true),
    ];
    modal("Submit attendance", "chat_attendance", &event.id.to_string(), blocks, Some("Confirm"))
}

/// Single section used while data is loading.
pub fn loading_view() -> Value {
    home(vec![section(":hourglass_flowing_sand: *Loading data...* One moment please.")])
}
