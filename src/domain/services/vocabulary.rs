use crate::domain::models::event::EventCategory;
use crate::domain::models::participation::AttendanceStatus;
use crate::domain::models::settings::{AppSettings, StatusLabels};

/// Label recorded in history when a user submits for the first time.
pub const UNSET_LABEL: &str = "Unset";

/// Maps canonical statuses to display labels. Trainings carry their own
/// label set; tournaments and other events share the general one.
#[derive(Debug, Clone)]
pub struct StatusVocabulary {
    general: StatusLabels,
    training: StatusLabels,
}

impl StatusVocabulary {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            general: settings.general_labels.clone(),
            training: settings.training_labels.clone(),
        }
    }

    pub fn display_label(&self, status: AttendanceStatus, category: EventCategory) -> &str {
        let labels = match category {
            EventCategory::Training => &self.training,
            EventCategory::Tournament | EventCategory::Other => &self.general,
        };
        match status {
            AttendanceStatus::Coming => &labels.coming,
            AttendanceStatus::Late => &labels.late,
            AttendanceStatus::NotComing => &labels.not_coming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> StatusVocabulary {
        let mut settings = AppSettings::default();
        settings.general_labels = StatusLabels {
            coming: "In".to_string(),
            late: "Maybe".to_string(),
            not_coming: "Out".to_string(),
        };
        settings.training_labels = StatusLabels {
            coming: "Will be there".to_string(),
            late: "Running late".to_string(),
            not_coming: "Skipping".to_string(),
        };
        StatusVocabulary::from_settings(&settings)
    }

    #[test]
    fn training_events_use_the_training_set() {
        let vocab = vocabulary();
        assert_eq!(vocab.display_label(AttendanceStatus::Coming, EventCategory::Training), "Will be there");
        assert_eq!(vocab.display_label(AttendanceStatus::Late, EventCategory::Training), "Running late");
        assert_eq!(vocab.display_label(AttendanceStatus::NotComing, EventCategory::Training), "Skipping");
    }

    #[test]
    fn non_training_events_share_the_general_set() {
        let vocab = vocabulary();
        assert_eq!(vocab.display_label(AttendanceStatus::Coming, EventCategory::Tournament), "In");
        assert_eq!(vocab.display_label(AttendanceStatus::Late, EventCategory::Other), "Maybe");
        assert_eq!(vocab.display_label(AttendanceStatus::NotComing, EventCategory::Tournament), "Out");
    }
}
