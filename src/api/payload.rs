use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;

use crate::error::AppError;

/// Form body of an interactivity callback: one `payload` field holding the
/// JSON document.
#[derive(Debug, Deserialize)]
pub struct InteractionEnvelope {
    pub payload: String,
}

/// Typed interactivity payloads this app consumes. Anything else fails to
/// parse and is rejected as a validation error.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionPayload {
    BlockActions(BlockActionsPayload),
    ViewSubmission(ViewSubmissionPayload),
    BlockSuggestion(BlockSuggestionPayload),
}

#[derive(Debug, Deserialize)]
pub struct BlockActionsPayload {
    pub user: UserRef,
    #[serde(default)]
    pub trigger_id: Option<String>,
    #[serde(default)]
    pub container: Option<Container>,
    #[serde(default)]
    pub view: Option<ViewRef>,
    pub actions: Vec<ActionItem>,
}

#[derive(Debug, Deserialize)]
pub struct ViewSubmissionPayload {
    pub user: UserRef,
    pub view: ViewRef,
}

/// External-select option query (typing into a user picker).
#[derive(Debug, Deserialize)]
pub struct BlockSuggestionPayload {
    pub action_id: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct UserRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub view_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionItem {
    pub action_id: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
}

#[derive(Debug, Deserialize)]
pub struct SelectedOption {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ViewRef {
    pub id: String,
    pub callback_id: String,
    #[serde(default)]
    pub private_metadata: String,
    #[serde(default)]
    pub state: ViewState,
}

/// Submitted form values, keyed by block id then element action id.
#[derive(Debug, Default, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, ElementState>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ElementState {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
    #[serde(default)]
    pub selected_date: Option<String>,
    #[serde(default)]
    pub selected_date_time: Option<i64>,
}

impl ViewState {
    fn element(&self, block_id: &str, action_id: &str) -> Option<&ElementState> {
        self.values.get(block_id)?.get(action_id)
    }

    /// Free-text input; absent and empty are both None.
    pub fn text(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.element(block_id, action_id)?
            .value
            .as_deref()
            .filter(|v| !v.is_empty())
    }

    pub fn required_text(&self, block_id: &str, action_id: &str, label: &str) -> Result<&str, AppError> {
        self.text(block_id, action_id)
            .ok_or_else(|| AppError::Validation(format!("Missing required field: {}", label)))
    }

    pub fn selected(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.element(block_id, action_id)?
            .selected_option
            .as_ref()
            .map(|o| o.value.as_str())
    }

    pub fn required_selected(&self, block_id: &str, action_id: &str, label: &str) -> Result<&str, AppError> {
        self.selected(block_id, action_id)
            .ok_or_else(|| AppError::Validation(format!("Missing required field: {}", label)))
    }

    pub fn date(&self, block_id: &str, action_id: &str, label: &str) -> Result<NaiveDate, AppError> {
        let raw = self
            .element(block_id, action_id)
            .and_then(|e| e.selected_date.as_deref())
            .ok_or_else(|| AppError::Validation(format!("Missing required field: {}", label)))?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AppError::Validation(format!("Invalid date in field: {}", label)))
    }

    /// Datetime-picker value (unix seconds).
    pub fn date_time(&self, block_id: &str, action_id: &str, label: &str) -> Result<DateTime<Utc>, AppError> {
        let ts = self
            .element(block_id, action_id)
            .and_then(|e| e.selected_date_time)
            .ok_or_else(|| AppError::Validation(format!("Missing required field: {}", label)))?;
        Utc.timestamp_opt(ts, 0)
            .single()
            .ok_or_else(|| AppError::Validation(format!("Invalid timestamp in field: {}", label)))
    }
}

/// Events API callbacks: the URL handshake and the app-home wrapper.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventCallback {
    UrlVerification { challenge: String },
    EventCallback { event: InboundEvent },
}

#[derive(Debug, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub tab: Option<String>,
}
