use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::domain::models::event::EventFilter;
use crate::error::AppError;

/// Events shown per page of the home attendance list and the admin list.
pub const EVENTS_PAGE_SIZE: usize = 10;
/// History entries per page of the change-history modal.
pub const HISTORY_PAGE_SIZE: usize = 50;
/// Three-way tab views (participants by status, missing players by group).
pub const STATUS_TAB_COUNT: u8 = 3;

/// Navigation state carried by every pagination control. Encoded as a
/// tagged JSON value in base64 so no field can collide with a delimiter,
/// and decoded (with bounds checks) before it is trusted.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum NavToken {
    /// Upcoming-events list: page within the current category filter.
    EventList { page: u32, filter: EventFilter },
    /// Fixed three-tab views, pages 0..=2.
    StatusTab { page: u8 },
    /// Per-event pagination (change history).
    EventPage { page: u32, event_id: i64 },
}

impl NavToken {
    pub fn encode(&self) -> String {
        encode_value(self)
    }

    pub fn decode(raw: &str) -> Result<Self, AppError> {
        let token: NavToken = decode_value(raw)?;
        if let NavToken::StatusTab { page } = token {
            if page >= STATUS_TAB_COUNT {
                return Err(AppError::Validation(format!("Tab page {} out of range", page)));
            }
        }
        Ok(token)
    }

    /// Token for the page after this one. Only attach it to a control when
    /// `Page::has_next` says more items remain.
    pub fn next(&self) -> NavToken {
        match *self {
            NavToken::EventList { page, filter } => NavToken::EventList { page: page + 1, filter },
            NavToken::StatusTab { page } => NavToken::StatusTab { page: page + 1 },
            NavToken::EventPage { page, event_id } => NavToken::EventPage { page: page + 1, event_id },
        }
    }

    /// Token for the previous page, absent on page 0.
    pub fn prev(&self) -> Option<NavToken> {
        match *self {
            NavToken::EventList { page, filter } => {
                page.checked_sub(1).map(|page| NavToken::EventList { page, filter })
            }
            NavToken::StatusTab { page } => page.checked_sub(1).map(|page| NavToken::StatusTab { page }),
            NavToken::EventPage { page, event_id } => {
                page.checked_sub(1).map(|page| NavToken::EventPage { page, event_id })
            }
        }
    }
}

/// Switching the filter always lands on page 0 of the new filter.
pub fn filter_change(filter: EventFilter) -> NavToken {
    NavToken::EventList { page: 0, filter }
}

/// Window of one page over an in-memory sequence. A page past the end
/// yields an empty window with no next control rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub start: usize,
    pub end: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

pub fn page_window(total: usize, page: u32, page_size: usize) -> Page {
    let start = (page as usize).saturating_mul(page_size).min(total);
    let end = (start + page_size).min(total);
    Page {
        start,
        end,
        has_prev: page > 0,
        has_next: end < total,
    }
}

/// Serializes a structured button value. All composite control values go
/// through this pair instead of hand-joined strings.
pub fn encode_value<T: Serialize>(value: &T) -> String {
    let json = serde_json::to_vec(value).expect("control value serialization cannot fail");
    URL_SAFE_NO_PAD.encode(json)
}

pub fn decode_value<T: DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(raw)
        .map_err(|_| AppError::Validation("Malformed control value".into()))?;
    serde_json::from_slice(&bytes).map_err(|_| AppError::Validation("Malformed control value".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        let tokens = [
            NavToken::EventList { page: 3, filter: EventFilter::Training },
            NavToken::EventList { page: 0, filter: EventFilter::All },
            NavToken::StatusTab { page: 2 },
            NavToken::EventPage { page: 17, event_id: 42 },
        ];
        for token in tokens {
            assert_eq!(NavToken::decode(&token.encode()).unwrap(), token);
        }
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(NavToken::decode("not base64 at all!").is_err());
        assert!(NavToken::decode(&URL_SAFE_NO_PAD.encode(b"{\"t\":\"event_list\"}")).is_err());
        assert!(NavToken::decode(&URL_SAFE_NO_PAD.encode(b"[1,2,3]")).is_err());
    }

    #[test]
    fn decode_rejects_negative_pages() {
        let raw = URL_SAFE_NO_PAD.encode(br#"{"t":"event_page","page":-1,"event_id":5}"#);
        assert!(NavToken::decode(&raw).is_err());
    }

    #[test]
    fn decode_bounds_status_tabs() {
        let raw = URL_SAFE_NO_PAD.encode(br#"{"t":"status_tab","page":3}"#);
        assert!(NavToken::decode(&raw).is_err());
        assert!(NavToken::decode(&NavToken::StatusTab { page: 2 }.encode()).is_ok());
    }

    #[test]
    fn next_and_prev_walk_the_event_list() {
        let token = NavToken::EventList { page: 1, filter: EventFilter::Tournament };
        assert_eq!(token.next(), NavToken::EventList { page: 2, filter: EventFilter::Tournament });
        assert_eq!(token.prev(), Some(NavToken::EventList { page: 0, filter: EventFilter::Tournament }));
        assert_eq!(token.prev().unwrap().prev(), None);
    }

    #[test]
    fn filter_change_resets_to_page_zero() {
        assert_eq!(
            filter_change(EventFilter::Other),
            NavToken::EventList { page: 0, filter: EventFilter::Other }
        );
    }

    #[test]
    fn window_hides_next_on_the_last_page() {
        let page = page_window(25, 2, 10);
        assert_eq!((page.start, page.end), (20, 25));
        assert!(page.has_prev);
        assert!(!page.has_next);
    }

    #[test]
    fn window_past_the_end_is_empty() {
        let page = page_window(8, 5, 10);
        assert_eq!((page.start, page.end), (8, 8));
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn window_with_exact_multiple_has_no_phantom_page() {
        let page = page_window(20, 1, 10);
        assert_eq!((page.start, page.end), (10, 20));
        assert!(!page.has_next);
    }
}
