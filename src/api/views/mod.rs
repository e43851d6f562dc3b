pub mod attendance;
pub mod edit;
pub mod events;
pub mod participants;
pub mod settings;

use chrono::{DateTime, Datelike, Utc, Weekday};
use serde_json::{json, Value};

pub(crate) fn plain(text: &str) -> Value {
    json!({ "type": "plain_text", "text": text })
}

pub(crate) fn mrkdwn(text: &str) -> Value {
    json!({ "type": "mrkdwn", "text": text })
}

pub(crate) fn section(text: &str) -> Value {
    json!({ "type": "section", "text": mrkdwn(text) })
}

pub(crate) fn header(text: &str) -> Value {
    json!({ "type": "header", "text": plain(text) })
}

pub(crate) fn divider() -> Value {
    json!({ "type": "divider" })
}

pub(crate) fn actions(elements: Vec<Value>) -> Value {
    json!({ "type": "actions", "elements": elements })
}

pub(crate) fn button(text: &str, action_id: &str, value: &str) -> Value {
    json!({
        "type": "button",
        "text": plain(text),
        "action_id": action_id,
        "value": value,
    })
}

pub(crate) fn primary_button(text: &str, action_id: &str, value: &str) -> Value {
    json!({
        "type": "button",
        "text": plain(text),
        "action_id": action_id,
        "value": value,
        "style": "primary",
    })
}

pub(crate) fn overflow(action_id: &str, options: Vec<(String, String)>) -> Value {
    let options: Vec<Value> = options
        .into_iter()
        .map(|(text, value)| json!({ "text": plain(&text), "value": value }))
        .collect();
    json!({ "type": "overflow", "options": options, "action_id": action_id })
}

pub(crate) fn text_input(
    block_id: &str,
    action_id: &str,
    label: &str,
    placeholder: Option<&str>,
    initial: Option<&str>,
    optional: bool,
) -> Value {
    let mut element = json!({ "type": "plain_text_input", "action_id": action_id });
    if let Some(placeholder) = placeholder {
        element["placeholder"] = plain(placeholder);
    }
    if let Some(initial) = initial {
        element["initial_value"] = json!(initial);
    }
    json!({
        "type": "input",
        "block_id": block_id,
        "element": element,
        "label": plain(label),
        "optional": optional,
    })
}

pub(crate) fn datetime_input(block_id: &str, action_id: &str, label: &str, initial: Option<DateTime<Utc>>) -> Value {
    let mut element = json!({ "type": "datetimepicker", "action_id": action_id });
    if let Some(initial) = initial {
        element["initial_date_time"] = json!(initial.timestamp());
    }
    json!({
        "type": "input",
        "block_id": block_id,
        "element": element,
        "label": plain(label),
    })
}

pub(crate) fn date_input(block_id: &str, action_id: &str, label: &str, placeholder: &str) -> Value {
    json!({
        "type": "input",
        "block_id": block_id,
        "element": {
            "type": "datepicker",
            "action_id": action_id,
            "placeholder": plain(placeholder),
        },
        "label": plain(label),
    })
}

pub(crate) fn static_select(
    block_id: &str,
    action_id: &str,
    label: &str,
    options: &[(String, String)],
    initial: Option<&str>,
) -> Value {
    let rendered: Vec<Value> = options
        .iter()
        .map(|(value, text)| json!({ "text": plain(text), "value": value }))
        .collect();
    let mut element = json!({
        "type": "static_select",
        "action_id": action_id,
        "options": rendered,
    });
    if let Some(initial) = initial {
        if let Some((value, text)) = options.iter().find(|(v, _)| v == initial) {
            element["initial_option"] = json!({ "text": plain(text), "value": value });
        }
    }
    json!({
        "type": "input",
        "block_id": block_id,
        "element": element,
        "label": plain(label),
    })
}

pub(crate) fn home(blocks: Vec<Value>) -> Value {
    json!({ "type": "home", "blocks": blocks })
}

pub(crate) fn modal(
    title: &str,
    callback_id: &str,
    private_metadata: &str,
    blocks: Vec<Value>,
    submit: Option<&str>,
) -> Value {
    let mut view = json!({
        "type": "modal",
        "callback_id": callback_id,
        "private_metadata": private_metadata,
        "title": plain(title),
        "close": plain("Close"),
        "blocks": blocks,
    });
    if let Some(submit) = submit {
        view["submit"] = plain(submit);
    }
    view
}

pub(crate) fn format_dt(dt: DateTime<Utc>) -> String {
    dt.format("%d.%m.%Y %H:%M").to_string()
}

pub(crate) fn day_short(dt: DateTime<Utc>) -> &'static str {
    match dt.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
