use serde_json::{json, Value};

use crate::api::actions::EditStatusTarget;
use crate::api::views::{
    actions, button, date_input, divider, format_dt, header, home, modal, overflow, plain, section,
};
use crate::domain::models::event::Event;
use crate::domain::models::participation::{AttendanceStatus, ParticipationRecord};
use crate::domain::models::user::{User, UserCategory};
use crate::domain::services::paging::encode_value;
use crate::domain::services::vocabulary::StatusVocabulary;

fn back_block() -> Value {
    actions(vec![button("Back", "go_to_attendance", "back")])
}

fn date_picker_blocks() -> Vec<Value> {
    vec![
        date_input("date_block", "date_select", "Pick a date to list its events", "Pick a date"),
        actions(vec![button("Select", "select_date", "select")]),
        divider(),
    ]
}

fn user_picker(action_id: &str, confirm_action: &str, confirm_value: &str, prompt: &str) -> Vec<Value> {
    vec![
        section(prompt),
        json!({
            "type": "actions",
            "block_id": "user_pick_block",
            "elements": [
                {
                    "type": "external_select",
                    "action_id": action_id,
                    "placeholder": plain("Pick a player..."),
                    "min_query_length": 2,
                },
                {
                    "type": "button",
                    "style": "primary",
                    "text": plain("Confirm"),
                    "action_id": confirm_action,
                    "value": confirm_value,
                },
            ],
        }),
        divider(),
    ]
}

/// Entry screen of the admin edit flow: date picker plus the player
/// category picker. The CSV export entry appears once an export channel is
/// configured.
pub fn edit_home_view(has_export: bool) -> Value {
    let mut blocks = Vec::new();
    if has_export {
        blocks.push(actions(vec![overflow(
            "edit_menu",
            vec![("Export to CSV".to_string(), "export_csv".to_string())],
        )]));
    }
    blocks.push(back_block());
    blocks.extend(date_picker_blocks());
    blocks.extend(user_picker(
        "category_user_search",
        "confirm_category_user",
        "category",
        "*Pick a player to change their category*",
    ));
    home(blocks)
}

/// The chosen day's events, each selectable for attendance editing.
pub fn events_by_day_view(events: &[Event], has_export: bool) -> Value {
    let mut blocks = Vec::new();
    if has_export {
        blocks.push(actions(vec![overflow(
            "edit_menu",
            vec![("Export to CSV".to_string(), "export_csv".to_string())],
        )]));
    }
    blocks.push(back_block());
    blocks.extend(date_picker_blocks());
    for event in events {
        blocks.push(json!({
            "type": "section",
            "text": super::mrkdwn(&format!(
                "*{}*\nStart: {}\nEnd: {}\nDeadline: {}\nCategory: {}\nAddress: {}",
                event.name,
                format_dt(event.start_time),
                format_dt(event.end_time),
                format_dt(event.lock_time),
                event.category.as_str(),
                event.address.as_deref().unwrap_or("Not set"),
            )),
            "accessory": {
                "type": "button",
                "text": plain("Select"),
                "action_id": "select_event",
                "value": event.id.to_string(),
            },
        }));
    }
    home(blocks)
}

/// Attendance editor for one event: a player picker and, once a player is
/// chosen, their status buttons.
pub fn edit_players_view(
    event: &Event,
    selected: Option<(&User, Option<&ParticipationRecord>)>,
    vocabulary: &StatusVocabulary,
) -> Value {
    let mut blocks = vec![back_block()];
    blocks.extend(date_picker_blocks());
    blocks.push(header("Attendance"));
    blocks.push(section(&format!(
        "*{}*\nStart: {}\nEnd: {}\nDeadline: {}\nCategory: {}\nAddress: {}",
        event.name,
        format_dt(event.start_time),
        format_dt(event.end_time),
        format_dt(event.lock_time),
        event.category.as_str(),
        event.address.as_deref().unwrap_or("Not set"),
    )));
    blocks.push(divider());
    blocks.extend(user_picker(
        "user_search",
        "confirm_edit_user",
        &event.id.to_string(),
        "*Pick a player*",
    ));

    if let Some((user, record)) = selected {
        let current = record.map(|r| r.status);
        blocks.push(section(&format!("*{}*", user.name)));

        let target = EditStatusTarget { event_id: event.id, user_id: user.user_id.clone() };
        let status_button = |action_id: &str, status: AttendanceStatus, emoji: &str| {
            let label = vocabulary.display_label(status, event.category);
            let selected = current == Some(status);
            let text = if selected { format!("{} {}", emoji, label) } else { label.to_string() };
            let mut b = button(&text, action_id, &encode_value(&target));
            if selected {
                b["style"] = json!("primary");
            }
            b
        };
        blocks.push(actions(vec![
            status_button("edit_status_coming", AttendanceStatus::Coming, "🟢"),
            status_button("edit_status_late", AttendanceStatus::Late, "🟡"),
            status_button("edit_status_not_coming", AttendanceStatus::NotComing, "🔴"),
        ]));
    }

    home(blocks)
}

/// Category editor for one player.
pub fn edit_category_view(user: &User) -> Value {
    let mut blocks = vec![back_block()];
    blocks.extend(user_picker(
        "category_user_search",
        "confirm_category_user",
        "category",
        "*Pick a player to change their category*",
    ));
    blocks.push(header("Edit player category"));
    blocks.push(section(&format!("*{}*", user.name)));

    let category_button = |action_id: &str, category: UserCategory, emoji: &str| {
        let selected = user.category == Some(category);
        let text = if selected {
            format!("{} {}", emoji, category.as_str())
        } else {
            category.as_str().to_string()
        };
        let mut b = button(&text, action_id, &user.user_id);
        if selected {
            b["style"] = json!("primary");
        }
        b
    };
    blocks.push(actions(vec![
        category_button("user_category_open", UserCategory::Open, ":large_blue_circle:"),
        category_button("user_category_women", UserCategory::Women, "🔴"),
    ]));
    blocks.push(divider());

    home(blocks)
}

/// Date-range picker for the CSV export.
pub fn export_modal() -> Value {
    let blocks = vec![
        date_input("start_date_block", "start_date_select", "Start date", "Pick the start date"),
        date_input("end_date_block", "end_date_select", "End date", "Pick the end date"),
    ];
    modal("Export participants", "export_dates", "", blocks, Some("Confirm"))
}

/// External-select options for the player pickers.
pub fn user_options(users: &[User], query: &str) -> Value {
    const MAX_RESULTS: usize = 100;
    let query = query.trim().to_lowercase();
    let options: Vec<Value> = users
        .iter()
        .filter(|u| query.is_empty() || u.name.to_lowercase().contains(&query))
        .take(MAX_RESULTS)
        .map(|u| json!({ "text": plain(&u.name), "value": u.user_id }))
        .collect();
    json!({ "options": options })
}
