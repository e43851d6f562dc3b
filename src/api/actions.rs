use serde::{Deserialize, Serialize};

use crate::api::payload::ActionItem;
use crate::domain::models::event::EventFilter;
use crate::domain::models::participation::AttendanceStatus;
use crate::domain::models::user::UserCategory;
use crate::domain::services::paging::{decode_value, NavToken};
use crate::error::AppError;

/// Target of a status button on the home list: which event, and which
/// (page, filter) to re-render afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct StatusTarget {
    pub event_id: i64,
    pub page: u32,
    pub filter: EventFilter,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DeleteTarget {
    pub event_id: i64,
    pub page: u32,
}

/// Admin override buttons: which user's record on which event.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EditStatusTarget {
    pub event_id: i64,
    pub user_id: String,
}

/// One entry of a per-event overflow menu.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct EventMenuChoice {
    pub event_id: i64,
    pub item: EventMenuItem,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventMenuItem {
    Participants,
    Details,
    History,
    MissingPlayers,
    Share,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Refresh,
    MassInsert,
    EditAttendance,
    Settings,
    ManageEvents,
}

impl MenuChoice {
    fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "refresh" => Ok(MenuChoice::Refresh),
            "mass_insert" => Ok(MenuChoice::MassInsert),
            "edit_attendance" => Ok(MenuChoice::EditAttendance),
            "settings" => Ok(MenuChoice::Settings),
            "manage_events" => Ok(MenuChoice::ManageEvents),
            other => Err(AppError::Validation(format!("Unknown menu entry: {}", other))),
        }
    }
}

/// Which paginated modal a navigation button belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Participants,
    MissingPlayers,
    History,
}

/// Every block action this app understands, parsed from the
/// (action id, value) pair of the interaction callback. The dispatcher
/// matches this enum exhaustively, so a new action kind that is not
/// handled fails to compile instead of silently falling through.
#[derive(Debug)]
pub enum Action {
    MainMenu(MenuChoice),
    OpenFilter { current: EventFilter },
    SetStatus { status: AttendanceStatus, target: StatusTarget },
    AttendancePage { token: NavToken },
    EventMenu(EventMenuChoice),
    EventListPage { token: NavToken },
    ModalPage { kind: ModalKind, token: NavToken },
    GoToAttendance,
    GoToAddEvent,
    GoToManageEvents,
    SubmitEvent,
    DeleteEvent(DeleteTarget),
    EditEvent { event_id: i64 },
    DuplicateEvent { event_id: i64 },
    SelectDate,
    SelectEvent { event_id: i64 },
    ConfirmEditUser { event_id: i64 },
    EditStatus { status: AttendanceStatus, target: EditStatusTarget },
    ConfirmCategoryUser,
    SetUserCategory { user_id: String, category: UserCategory },
    SaveSettings,
    ExportParticipants,
    OpenAttendanceModal { event_id: i64 },
    /// Select elements fire an interaction on pick; nothing to do until the
    /// accompanying confirm button is pressed.
    Noop,
}

fn value_of<'a>(item: &'a ActionItem) -> Result<&'a str, AppError> {
    item.value
        .as_deref()
        .ok_or_else(|| AppError::Validation(format!("Action {} carried no value", item.action_id)))
}

fn selected_of<'a>(item: &'a ActionItem) -> Result<&'a str, AppError> {
    item.selected_option
        .as_ref()
        .map(|o| o.value.as_str())
        .ok_or_else(|| AppError::Validation(format!("Action {} carried no selection", item.action_id)))
}

fn event_id_of(item: &ActionItem) -> Result<i64, AppError> {
    value_of(item)?
        .parse()
        .map_err(|_| AppError::Validation(format!("Action {} carried a malformed event id", item.action_id)))
}

impl Action {
    pub fn parse(item: &ActionItem) -> Result<Self, AppError> {
        match item.action_id.as_str() {
            "main_menu" => Ok(Action::MainMenu(MenuChoice::parse(selected_of(item)?)?)),
            "open_filter" => Ok(Action::OpenFilter { current: EventFilter::parse(value_of(item)?)? }),
            "attendance_coming" => Ok(Action::SetStatus {
                status: AttendanceStatus::Coming,
                target: decode_value(value_of(item)?)?,
            }),
            "attendance_late" => Ok(Action::SetStatus {
                status: AttendanceStatus::Late,
                target: decode_value(value_of(item)?)?,
            }),
            "attendance_not_coming" => Ok(Action::SetStatus {
                status: AttendanceStatus::NotComing,
                target: decode_value(value_of(item)?)?,
            }),
            "attendance_page" => Ok(Action::AttendancePage { token: NavToken::decode(value_of(item)?)? }),
            "event_menu" => Ok(Action::EventMenu(decode_value(selected_of(item)?)?)),
            "event_list_page" => Ok(Action::EventListPage { token: NavToken::decode(value_of(item)?)? }),
            "participants_page" => Ok(Action::ModalPage {
                kind: ModalKind::Participants,
                token: NavToken::decode(value_of(item)?)?,
            }),
            "missing_players_page" => Ok(Action::ModalPage {
                kind: ModalKind::MissingPlayers,
                token: NavToken::decode(value_of(item)?)?,
            }),
            "history_page" => Ok(Action::ModalPage {
                kind: ModalKind::History,
                token: NavToken::decode(value_of(item)?)?,
            }),
            "go_to_attendance" => Ok(Action::GoToAttendance),
            "go_to_add_event" => Ok(Action::GoToAddEvent),
            "go_to_manage_events" => Ok(Action::GoToManageEvents),
            "submit_event" => Ok(Action::SubmitEvent),
            "delete_event" => Ok(Action::DeleteEvent(decode_value(value_of(item)?)?)),
            "edit_event" => Ok(Action::EditEvent { event_id: event_id_of(item)? }),
            "duplicate_event" => Ok(Action::DuplicateEvent { event_id: event_id_of(item)? }),
            "select_date" => Ok(Action::SelectDate),
            "select_event" => Ok(Action::SelectEvent { event_id: event_id_of(item)? }),
            "confirm_edit_user" => Ok(Action::ConfirmEditUser { event_id: event_id_of(item)? }),
            "edit_status_coming" => Ok(Action::EditStatus {
                status: AttendanceStatus::Coming,
                target: decode_value(value_of(item)?)?,
            }),
            "edit_status_late" => Ok(Action::EditStatus {
                status: AttendanceStatus::Late,
                target: decode_value(value_of(item)?)?,
            }),
            "edit_status_not_coming" => Ok(Action::EditStatus {
                status: AttendanceStatus::NotComing,
                target: decode_value(value_of(item)?)?,
            }),
            "confirm_category_user" => Ok(Action::ConfirmCategoryUser),
            "user_category_open" => Ok(Action::SetUserCategory {
                user_id: value_of(item)?.to_string(),
                category: UserCategory::Open,
            }),
            "user_category_women" => Ok(Action::SetUserCategory {
                user_id: value_of(item)?.to_string(),
                category: UserCategory::Women,
            }),
            "save_settings" => Ok(Action::SaveSettings),
            "edit_menu" => match selected_of(item)? {
                "export_csv" => Ok(Action::ExportParticipants),
                other => Err(AppError::Validation(format!("Unknown edit menu entry: {}", other))),
            },
            "open_attendance_modal" => Ok(Action::OpenAttendanceModal { event_id: event_id_of(item)? }),
            "user_search" | "category_user_search" => Ok(Action::Noop),
            other => Err(AppError::Validation(format!("Unknown action: {}", other))),
        }
    }
}

/// Modal submissions, identified by callback id. Event-scoped modals carry
/// the event id in private metadata.
#[derive(Debug, PartialEq, Eq)]
pub enum Submission {
    Filter,
    MassInsert,
    EditEvent { event_id: i64 },
    DuplicateEvent { event_id: i64 },
    ExportDates,
    ShareEvent { event_id: i64 },
    ChatAttendance { event_id: i64 },
}

impl Submission {
    pub fn parse(callback_id: &str, private_metadata: &str) -> Result<Self, AppError> {
        let event_id = || {
            private_metadata.parse::<i64>().map_err(|_| {
                AppError::Validation(format!("Modal {} carried a malformed event id", callback_id))
            })
        };
        match callback_id {
            "filter_submit" => Ok(Submission::Filter),
            "mass_insert" => Ok(Submission::MassInsert),
            "edit_event" => Ok(Submission::EditEvent { event_id: event_id()? }),
            "duplicate_event" => Ok(Submission::DuplicateEvent { event_id: event_id()? }),
            "export_dates" => Ok(Submission::ExportDates),
            "share_event" => Ok(Submission::ShareEvent { event_id: event_id()? }),
            "chat_attendance" => Ok(Submission::ChatAttendance { event_id: event_id()? }),
            other => Err(AppError::Validation(format!("Unknown modal submission: {}", other))),
        }
    }
}
