/// Mutable application settings: label overrides, the admin usergroup and
/// the player groups, plus the export channel. Loaded from the settings
/// table into an immutable snapshot; a reload swaps the whole snapshot so
/// readers never observe a half-updated mix of keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub admin_group: Option<String>,
    pub open_players_group: Option<String>,
    pub women_players_group: Option<String>,
    pub export_channel: Option<String>,
    pub general_labels: StatusLabels,
    pub training_labels: StatusLabels,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLabels {
    pub coming: String,
    pub late: String,
    pub not_coming: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            admin_group: None,
            open_players_group: None,
            women_players_group: None,
            export_channel: None,
            general_labels: StatusLabels {
                coming: "Coming".to_string(),
                late: "Late".to_string(),
                not_coming: "Not Coming".to_string(),
            },
            training_labels: StatusLabels {
                coming: "Coming".to_string(),
                late: "Late".to_string(),
                not_coming: "Not Coming".to_string(),
            },
        }
    }
}

impl AppSettings {
    /// Flattens the settings into key/value rows for the settings table.
    /// Absent group/channel ids persist as empty strings.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("admin_group", self.admin_group.clone().unwrap_or_default()),
            ("open_players_group", self.open_players_group.clone().unwrap_or_default()),
            ("women_players_group", self.women_players_group.clone().unwrap_or_default()),
            ("export_channel", self.export_channel.clone().unwrap_or_default()),
            ("coming_text", self.general_labels.coming.clone()),
            ("late_text", self.general_labels.late.clone()),
            ("notcoming_text", self.general_labels.not_coming.clone()),
            ("coming_training", self.training_labels.coming.clone()),
            ("late_training", self.training_labels.late.clone()),
            ("notcoming_training", self.training_labels.not_coming.clone()),
        ]
    }

    /// Rebuilds a snapshot from stored rows, falling back to defaults for
    /// missing keys. Empty values mean "unset" for the id-valued keys.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut settings = AppSettings::default();
        for (key, value) in pairs {
            let id_value = if value.is_empty() { None } else { Some(value.clone()) };
            match key.as_str() {
                "admin_group" => settings.admin_group = id_value,
                "open_players_group" => settings.open_players_group = id_value,
                "women_players_group" => settings.women_players_group = id_value,
                "export_channel" => settings.export_channel = id_value,
                "coming_text" if !value.is_empty() => settings.general_labels.coming = value,
                "late_text" if !value.is_empty() => settings.general_labels.late = value,
                "notcoming_text" if !value.is_empty() => settings.general_labels.not_coming = value,
                "coming_training" if !value.is_empty() => settings.training_labels.coming = value,
                "late_training" if !value.is_empty() => settings.training_labels.late = value,
                "notcoming_training" if !value.is_empty() => settings.training_labels.not_coming = value,
                _ => {}
            }
        }
        settings
    }
}
