//! Spreadsheet-backed event log.
//!
//! Events live as rows of one worksheet, columns `A:F`:
//! Timestamp, SessionID, Nickname, MoodScore, Emoticon, Comment. The log
//! is append-only; nothing here rewrites or deletes rows.

mod client;

pub use client::SheetsClient;

use crate::error::Result;
use crate::types::{MoodEvent, NewMoodEvent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read/append access to the mood event log.
///
/// Reads return events ordered by arrival (row order). Appends assign the
/// timestamp server-side and return it.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append one event, returning the store-assigned timestamp.
    async fn append_event(&self, event: &NewMoodEvent) -> Result<DateTime<Utc>>;

    /// All events for one session, in arrival order.
    async fn session_events(&self, session_id: &str) -> Result<Vec<MoodEvent>>;

    /// Every event in the log, in arrival order (admin view).
    async fn all_events(&self) -> Result<Vec<MoodEvent>>;
}

/// Column headers of the event worksheet.
pub const HEADER_ROW: [&str; 6] = [
    "Timestamp",
    "SessionID",
    "Nickname",
    "MoodScore",
    "Emoticon",
    "Comment",
];

/// Encode an event as a worksheet row.
pub(crate) fn encode_row(event: &NewMoodEvent, timestamp: DateTime<Utc>) -> Vec<String> {
    vec![
        timestamp.to_rfc3339(),
        event.session_id.clone(),
        event.nickname.clone(),
        event.mood_score.to_string(),
        event.emoticon.clone().unwrap_or_default(),
        event.comment.clone().unwrap_or_default(),
    ]
}

/// Decode a worksheet row into an event.
///
/// The decode side is defensive: a non-numeric score reads as 0, a missing
/// comment as empty. A row whose timestamp does not parse is unusable and
/// yields `None` (the caller drops it with a warning); the write side
/// always emits RFC 3339, so this only fires on hand-edited rows.
pub(crate) fn decode_row(row: &[serde_json::Value]) -> Option<MoodEvent> {
    let cell = |i: usize| row.get(i).and_then(|v| v.as_str()).unwrap_or("");

    let timestamp = DateTime::parse_from_rfc3339(cell(0))
        .ok()?
        .with_timezone(&Utc);

    let emoticon = cell(4);

    Some(MoodEvent {
        session_id: cell(1).to_string(),
        nickname: cell(2).to_string(),
        mood_score: cell(3).parse().unwrap_or(0),
        comment: cell(5).to_string(),
        emoticon: (!emoticon.is_empty()).then(|| emoticon.to_string()),
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission() -> NewMoodEvent {
        NewMoodEvent {
            session_id: "standup-42".to_string(),
            nickname: "Alice".to_string(),
            mood_score: -3,
            comment: Some("rough morning".to_string()),
            emoticon: Some("😓".to_string()),
        }
    }

    #[test]
    fn encode_then_decode_preserves_the_event() {
        let ts = Utc::now();
        let row: Vec<serde_json::Value> = encode_row(&submission(), ts)
            .into_iter()
            .map(serde_json::Value::String)
            .collect();

        let event = decode_row(&row).expect("row should decode");
        assert_eq!(event.session_id, "standup-42");
        assert_eq!(event.nickname, "Alice");
        assert_eq!(event.mood_score, -3);
        assert_eq!(event.comment, "rough morning");
        assert_eq!(event.emoticon.as_deref(), Some("😓"));
        assert_eq!(event.timestamp, ts.with_timezone(&Utc));
    }

    #[test]
    fn malformed_score_decodes_as_zero() {
        let row = vec![
            json!("2024-06-03T10:00:00Z"),
            json!("s1"),
            json!("bob"),
            json!("not-a-number"),
            json!(""),
            json!(""),
        ];
        let event = decode_row(&row).unwrap();
        assert_eq!(event.mood_score, 0);
        assert_eq!(event.emoticon, None);
    }

    #[test]
    fn short_rows_decode_with_defaults() {
        let row = vec![json!("2024-06-03T10:00:00Z"), json!("s1"), json!("bob")];
        let event = decode_row(&row).unwrap();
        assert_eq!(event.mood_score, 0);
        assert_eq!(event.comment, "");
    }

    #[test]
    fn unparseable_timestamp_drops_the_row() {
        let row = vec![json!("yesterday-ish"), json!("s1"), json!("bob"), json!("2")];
        assert!(decode_row(&row).is_none());
    }
}
