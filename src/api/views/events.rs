use serde_json::{json, Value};

use crate::api::actions::DeleteTarget;
use crate::api::views::{
    actions, button, datetime_input, divider, format_dt, header, home, modal, plain,
    primary_button, static_select, text_input,
};
use crate::domain::models::event::{Event, EventCategory, EventFilter};
use crate::domain::services::paging::{encode_value, page_window, NavToken, EVENTS_PAGE_SIZE};

fn category_options() -> Vec<(String, String)> {
    [EventCategory::Training, EventCategory::Tournament, EventCategory::Other]
        .iter()
        .map(|c| (c.as_str().to_string(), c.as_str().to_string()))
        .collect()
}

fn event_summary(event: &Event) -> String {
    format!(
        "*{}*\nStart: {}\nEnd: {}\nDeadline: {}\nCategory: {}\nAddress: {}",
        event.name,
        format_dt(event.start_time),
        format_dt(event.end_time),
        format_dt(event.lock_time),
        event.category.as_str(),
        event.address.as_deref().unwrap_or("Not set"),
    )
}

/// Admin event list: delete with confirmation, edit and duplicate per
/// event, paginated.
pub fn manage_events_view(events: &[Event], page: u32) -> Value {
    let mut blocks = vec![actions(vec![
        primary_button("Add event", "go_to_add_event", "add"),
        button("Back", "go_to_attendance", "back"),
    ])];

    let window = page_window(events.len(), page, EVENTS_PAGE_SIZE);
    for event in &events[window.start..window.end] {
        let delete_value = encode_value(&DeleteTarget { event_id: event.id, page });
        blocks.push(json!({
            "type": "section",
            "text": super::mrkdwn(&event_summary(event)),
            "accessory": {
                "type": "button",
                "text": plain("Delete"),
                "style": "danger",
                "action_id": "delete_event",
                "value": delete_value,
                "confirm": {
                    "title": plain("Really delete this event?"),
                    "text": super::mrkdwn(&format!("The event *{}* will be permanently removed.", event.name)),
                    "confirm": plain("Delete"),
                    "deny": plain("Cancel"),
                },
            },
        }));
        blocks.push(actions(vec![
            button("Edit", "edit_event", &event.id.to_string()),
            button("Duplicate", "duplicate_event", &event.id.to_string()),
        ]));
        blocks.push(divider());
    }

    let token = NavToken::EventList { page, filter: EventFilter::All };
    if window.has_next {
        blocks.push(actions(vec![button("Next page", "event_list_page", &token.next().encode())]));
    }
    if let Some(prev) = token.prev() {
        blocks.push(actions(vec![button("Previous page", "event_list_page", &prev.encode())]));
    }

    home(blocks)
}

pub fn empty_events_view() -> Value {
    home(vec![
        actions(vec![
            primary_button("Add event", "go_to_add_event", "add"),
            button("Back", "go_to_attendance", "back"),
        ]),
        super::section("No upcoming events are scheduled."),
    ])
}

/// Event creation form shown in the home tab; submitted through the
/// `submit_event` button so the values arrive with the action payload.
pub fn add_event_view() -> Value {
    home(vec![
        actions(vec![button("Back", "go_to_manage_events", "back")]),
        header("Add a new event"),
        text_input("name_block", "name_input", "Event name", Some("Event name"), None, false),
        datetime_input("start_time_block", "start_time_input", "Start date and time", None),
        datetime_input("end_time_block", "end_time_input", "End date and time", None),
        datetime_input("lock_time_block", "lock_time_input", "Submission deadline", None),
        static_select("category_block", "category_input", "Event category", &category_options(), None),
        text_input("address_block", "address_input", "Address", Some("Venue address (optional)"), None, true),
        actions(vec![primary_button("Add event", "submit_event", "submit")]),
    ])
}

pub fn details_modal(event: &Event) -> Value {
    let blocks = vec![super::section(&event_summary(event))];
    modal("Details", "event_details", "", blocks, None)
}

pub fn duplicate_modal(event_id: i64) -> Value {
    let blocks = vec![json!({
        "type": "input",
        "block_id": "count_block",
        "element": {
            "type": "number_input",
            "is_decimal_allowed": false,
            "min_value": "1",
            "max_value": "52",
            "action_id": "count_input",
            "placeholder": plain("Number of weekly copies"),
        },
        "label": plain("Number of copies"),
    })];
    modal("Duplicate event", "duplicate_event", &event_id.to_string(), blocks, Some("Confirm"))
}

pub fn edit_modal(event: &Event) -> Value {
    let blocks = vec![
        text_input("name_block", "name_input", "Event name", None, Some(&event.name), false),
        static_select(
            "category_block",
            "category_input",
            "Category",
            &category_options(),
            Some(event.category.as_str()),
        ),
        datetime_input("lock_time_block", "lock_time_input", "Submission deadline", Some(event.lock_time)),
        text_input(
            "address_block",
            "address_input",
            "Address",
            Some("Venue address (optional)"),
            event.address.as_deref(),
            true,
        ),
    ];
    modal("Edit event", "edit_event", &event.id.to_string(), blocks, Some("Confirm"))
}

pub fn share_modal(event_id: i64, channels: &[(String, String)]) -> Value {
    let blocks = vec![
        text_input("message_block", "message_input", "Message", Some("Message to post with the event"), None, false),
        static_select("channel_block", "channel_select", "Channel", channels, None),
    ];
    modal("Share event", "share_event", &event_id.to_string(), blocks, Some("Confirm"))
}

/// Message posted into a channel when an event is shared.
pub fn share_message_blocks(event_id: i64, text: &str) -> Value {
    json!([
        super::section(text),
        actions(vec![button("Submit attendance", "open_attendance_modal", &event_id.to_string())]),
    ])
}
