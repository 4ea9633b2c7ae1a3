//! Core domain types for moodflow
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Session** | One meeting's scoped collection of mood events, identified by an opaque string |
//! | **Participant** | A person submitting mood events, identified by nickname within a session |
//! | **Mood score** | Integer sentiment rating in [-5, 5] reported at a point in time |
//! | **Event log** | The append-only spreadsheet rows backing a session |
//!
//! Nicknames are display identities, not accounts: they are compared by
//! exact string equality, so `"Alice"` and `"alice"` are two participants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest score a participant can submit.
pub const MIN_MOOD_SCORE: i32 = -5;
/// Highest score a participant can submit.
pub const MAX_MOOD_SCORE: i32 = 5;

/// One recorded mood observation.
///
/// The timestamp is assigned by the store at append time, never by the
/// client. Field names serialize camelCase to match the JSON wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEvent {
    /// Opaque string grouping events into one meeting
    pub session_id: String,
    /// Participant display identity (grouping key, not globally unique)
    pub nickname: String,
    /// Sentiment rating in [-5, 5]
    pub mood_score: i32,
    /// Free text, may be empty
    #[serde(default)]
    pub comment: String,
    /// Short symbolic tag, e.g. an emoji
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoticon: Option<String>,
    /// Store-assigned creation instant
    pub timestamp: DateTime<Utc>,
}

/// A client-submitted mood event, before the store assigns a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMoodEvent {
    pub session_id: String,
    pub nickname: String,
    pub mood_score: i32,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub emoticon: Option<String>,
}

impl NewMoodEvent {
    /// Validate required fields and the score range.
    ///
    /// This runs at ingestion; the aggregators downstream assume scores are
    /// in range but tolerate violations as ordinary numbers.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.session_id.trim().is_empty() {
            return Err(crate::error::Error::Validation(
                "sessionId is required".to_string(),
            ));
        }
        if self.nickname.trim().is_empty() {
            return Err(crate::error::Error::Validation(
                "nickname is required".to_string(),
            ));
        }
        if self.mood_score < MIN_MOOD_SCORE || self.mood_score > MAX_MOOD_SCORE {
            return Err(crate::error::Error::Validation(format!(
                "moodScore must be between {} and {}",
                MIN_MOOD_SCORE, MAX_MOOD_SCORE
            )));
        }
        Ok(())
    }

    /// Materialize into a [`MoodEvent`] with the given store timestamp.
    pub fn into_event(self, timestamp: DateTime<Utc>) -> MoodEvent {
        MoodEvent {
            session_id: self.session_id,
            nickname: self.nickname,
            mood_score: self.mood_score,
            comment: self.comment.unwrap_or_default(),
            emoticon: self.emoticon.filter(|e| !e.is_empty()),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(score: i32) -> NewMoodEvent {
        NewMoodEvent {
            session_id: "standup-42".to_string(),
            nickname: "Alice".to_string(),
            mood_score: score,
            comment: None,
            emoticon: None,
        }
    }

    #[test]
    fn validate_accepts_boundary_scores() {
        assert!(submission(MIN_MOOD_SCORE).validate().is_ok());
        assert!(submission(MAX_MOOD_SCORE).validate().is_ok());
        assert!(submission(0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_scores() {
        assert!(submission(6).validate().is_err());
        assert!(submission(-6).validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_identity() {
        let mut event = submission(2);
        event.nickname = "  ".to_string();
        assert!(event.validate().is_err());

        let mut event = submission(2);
        event.session_id = String::new();
        assert!(event.validate().is_err());
    }

    #[test]
    fn into_event_defaults_optional_fields() {
        let ts = Utc::now();
        let event = submission(3).into_event(ts);
        assert_eq!(event.comment, "");
        assert_eq!(event.emoticon, None);
        assert_eq!(event.timestamp, ts);
    }

    #[test]
    fn mood_event_uses_camel_case_wire_names() {
        let event = submission(1).into_event(Utc::now());
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("sessionId").is_some());
        assert!(json.get("moodScore").is_some());
        assert!(json.get("session_id").is_none());
    }
}
