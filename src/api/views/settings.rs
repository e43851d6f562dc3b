use serde_json::Value;

use crate::api::views::{actions, button, header, home, primary_button, static_select, text_input};
use crate::domain::models::settings::AppSettings;

const NO_VALUE: &str = "none";

fn with_none(options: &[(String, String)]) -> Vec<(String, String)> {
    let mut all = vec![(NO_VALUE.to_string(), "No value".to_string())];
    all.extend_from_slice(options);
    all
}

fn initial(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NO_VALUE)
}

/// Decodes a group/channel selection back into an optional id.
pub fn selected_id(raw: &str) -> Option<String> {
    if raw == NO_VALUE {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Admin settings screen: group and channel bindings plus the six status
/// labels.
pub fn settings_view(
    settings: &AppSettings,
    usergroups: &[(String, String)],
    channels: &[(String, String)],
) -> Value {
    let groups = with_none(usergroups);
    let channels = with_none(channels);

    home(vec![
        actions(vec![button("Back", "go_to_attendance", "back")]),
        header("Application settings"),
        static_select(
            "admin_group_block",
            "admin_group_select",
            "Admin group",
            &groups,
            Some(initial(&settings.admin_group)),
        ),
        static_select(
            "open_players_block",
            "open_players_select",
            "Active open players group",
            &groups,
            Some(initial(&settings.open_players_group)),
        ),
        static_select(
            "women_players_block",
            "women_players_select",
            "Active women players group",
            &groups,
            Some(initial(&settings.women_players_group)),
        ),
        static_select(
            "export_channel_block",
            "export_channel_select",
            "Export channel",
            &channels,
            Some(initial(&settings.export_channel)),
        ),
        text_input("coming_text_block", "coming_text_input", "Label for 'Coming'", None, Some(&settings.general_labels.coming), false),
        text_input("late_text_block", "late_text_input", "Label for 'Late'", None, Some(&settings.general_labels.late), false),
        text_input("notcoming_text_block", "notcoming_text_input", "Label for 'Not Coming'", None, Some(&settings.general_labels.not_coming), false),
        text_input("coming_training_block", "coming_training_input", "Label for 'Coming' (training)", None, Some(&settings.training_labels.coming), false),
        text_input("late_training_block", "late_training_input", "Label for 'Late' (training)", None, Some(&settings.training_labels.late), false),
        text_input("notcoming_training_block", "notcoming_training_input", "Label for 'Not Coming' (training)", None, Some(&settings.training_labels.not_coming), false),
        actions(vec![primary_button("Save settings", "save_settings", "save")]),
    ])
}
