use serde_json::Value;

use crate::api::views::{actions, button, modal, section};
use crate::domain::models::event::Event;
use crate::domain::models::history::HistoryEntry;
use crate::domain::models::participation::{AttendanceStatus, EventParticipant};
use crate::domain::services::paging::{page_window, NavToken, HISTORY_PAGE_SIZE, STATUS_TAB_COUNT};
use crate::domain::services::vocabulary::StatusVocabulary;

fn tab_navigation(action_id: &str, token: NavToken, has_next: bool) -> Option<Value> {
    let mut elements = Vec::new();
    if let Some(prev) = token.prev() {
        elements.push(button("◀️ Previous", action_id, &prev.encode()));
    }
    if has_next {
        elements.push(button("Next ▶️", action_id, &token.next().encode()));
    }
    if elements.is_empty() {
        None
    } else {
        Some(actions(elements))
    }
}

fn participant_line(p: &EventParticipant) -> String {
    match p.note.as_deref() {
        Some(note) => format!("{} - {}", p.name, note),
        None => p.name.clone(),
    }
}

/// One status tab of the participants modal: everyone on that status,
/// grouped into open players, women players and the rest.
pub fn participants_modal(
    event: &Event,
    participants: &[EventParticipant],
    vocabulary: &StatusVocabulary,
    open_members: &[String],
    women_members: &[String],
    page: u8,
) -> Value {
    let tabs = [
        (AttendanceStatus::Coming, "🟢"),
        (AttendanceStatus::Late, "🟡"),
        (AttendanceStatus::NotComing, "🔴"),
    ];
    let (status, emoji) = tabs[page.min(STATUS_TAB_COUNT - 1) as usize];
    let label = vocabulary.display_label(status, event.category);

    let mut open = Vec::new();
    let mut women = Vec::new();
    let mut other = Vec::new();
    for p in participants.iter().filter(|p| p.status == status) {
        let line = participant_line(p);
        if open_members.contains(&p.user_id) {
            open.push(line);
        } else if women_members.contains(&p.user_id) {
            women.push(line);
        } else {
            other.push(line);
        }
    }

    let total = open.len() + women.len() + other.len();
    let text = format!(
        "{} {} *{}* ( {} :mens: {} :womens: )\n{}",
        emoji,
        total,
        label,
        open.len(),
        women.len(),
        open.into_iter().chain(women).chain(other).collect::<Vec<_>>().join("\n"),
    );

    let mut blocks = vec![section(&text)];
    let token = NavToken::StatusTab { page };
    if let Some(nav) = tab_navigation("participants_page", token, page + 1 < STATUS_TAB_COUNT) {
        blocks.push(nav);
    }

    modal("Participants", "participants_modal", &event.id.to_string(), blocks, None)
}

/// One tab of the missing-players modal: group members with no record yet,
/// plus a tab of respondents outside both groups.
pub fn missing_players_modal(
    event_id: i64,
    participants: &[EventParticipant],
    open_members: &[String],
    women_members: &[String],
    users: &[(String, String)],
    page: u8,
) -> Value {
    let name_of = |user_id: &str| {
        users
            .iter()
            .find(|(id, _)| id == user_id)
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| user_id.to_string())
    };

    let responded: Vec<&str> = participants.iter().map(|p| p.user_id.as_str()).collect();
    let mut missing_open: Vec<String> = open_members
        .iter()
        .filter(|id| !responded.contains(&id.as_str()))
        .map(|id| name_of(id))
        .collect();
    let mut missing_women: Vec<String> = women_members
        .iter()
        .filter(|id| !responded.contains(&id.as_str()))
        .map(|id| name_of(id))
        .collect();
    let mut unassigned: Vec<String> = participants
        .iter()
        .filter(|p| !open_members.contains(&p.user_id) && !women_members.contains(&p.user_id))
        .map(|p| p.name.clone())
        .collect();
    missing_open.sort();
    missing_women.sort();
    unassigned.sort();

    let tabs = [
        (":mens: *Missing open players*", missing_open),
        (":womens: *Missing women players*", missing_women),
        ("⚪ *Unassigned players*", unassigned),
    ];
    let page = page.min(STATUS_TAB_COUNT - 1);
    let (title, names) = &tabs[page as usize];

    let mut blocks = vec![section(&format!("{}\n{}", title, names.join("\n")))];
    let token = NavToken::StatusTab { page };
    if let Some(nav) = tab_navigation("missing_players_page", token, page + 1 < STATUS_TAB_COUNT) {
        blocks.push(nav);
    }

    modal("Missing players", "missing_players_modal", &event_id.to_string(), blocks, None)
}

fn note_suffix(note: Option<&str>) -> String {
    match note {
        Some(n) if !n.trim().is_empty() => format!(" ({})", n),
        _ => String::new(),
    }
}

fn history_line(entry: &HistoryEntry) -> String {
    format!(
        "*{}*: `{}`{} -> `{}`{} | {}",
        entry.user_name,
        entry.old_status,
        note_suffix(entry.old_note.as_deref()),
        entry.new_status,
        note_suffix(entry.new_note.as_deref()),
        entry.timestamp.format("%d.%m.%Y %H:%M"),
    )
}

/// Change-history modal: a pure slice of the full newest-first log.
pub fn history_modal(event_id: i64, entries: &[HistoryEntry], page: u32) -> Value {
    let window = page_window(entries.len(), page, HISTORY_PAGE_SIZE);
    let mut blocks: Vec<Value> = entries[window.start..window.end]
        .iter()
        .map(|entry| section(&history_line(entry)))
        .collect();

    let token = NavToken::EventPage { page, event_id };
    if let Some(nav) = tab_navigation("history_page", token, window.has_next) {
        blocks.push(nav);
    }

    modal("Change history", "history_modal", &event_id.to_string(), blocks, None)
}
