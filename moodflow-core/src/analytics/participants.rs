//! Per-participant aggregation and ranking.

use crate::analytics::trend::{classify_trend, Trend};
use crate::types::MoodEvent;
use serde::Serialize;
use std::collections::HashMap;

/// Maximum number of sample entries kept per participant.
pub const SAMPLE_LIMIT: usize = 5;

/// Derived summary for one participant within a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub nickname: String,
    /// Number of events this participant submitted
    pub count: usize,
    /// Mean of this participant's scores
    pub average_score: f64,
    /// Directional classification over the scores in arrival order
    pub trend: Trend,
    /// First [`SAMPLE_LIMIT`] entries, in arrival order
    pub entries: Vec<MoodEvent>,
}

/// Group a session's events by nickname and rank participants by volume.
///
/// Grouping is exact string equality on the nickname, no normalization:
/// `"Alice"` and `"alice"` are distinct participants. Each group keeps its
/// events in the order they appear in the input, which the caller must
/// guarantee matches arrival order. The ranking sorts by event count
/// descending; ties keep first-appearance order (the sort is stable over
/// a first-seen ordered grouping).
pub fn summarize_participants(events: &[MoodEvent]) -> Vec<ParticipantSummary> {
    // Single pass keyed accumulation, preserving first-seen group order
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&MoodEvent>)> = Vec::new();

    for event in events {
        match index.get(event.nickname.as_str()) {
            Some(&i) => groups[i].1.push(event),
            None => {
                index.insert(event.nickname.as_str(), groups.len());
                groups.push((event.nickname.as_str(), vec![event]));
            }
        }
    }

    let mut summaries: Vec<ParticipantSummary> = groups
        .into_iter()
        .map(|(nickname, entries)| {
            let scores: Vec<i32> = entries.iter().map(|e| e.mood_score).collect();
            let average_score = scores.iter().map(|s| *s as f64).sum::<f64>() / scores.len() as f64;

            ParticipantSummary {
                nickname: nickname.to_string(),
                count: entries.len(),
                average_score,
                trend: classify_trend(&scores),
                entries: entries
                    .into_iter()
                    .take(SAMPLE_LIMIT)
                    .cloned()
                    .collect(),
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(nickname: &str, score: i32) -> MoodEvent {
        MoodEvent {
            session_id: "s1".to_string(),
            nickname: nickname.to_string(),
            mood_score: score,
            comment: String::new(),
            emoticon: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn empty_input_yields_no_summaries() {
        assert!(summarize_participants(&[]).is_empty());
    }

    #[test]
    fn grouping_is_case_sensitive() {
        let events = vec![event("Alice", 1), event("alice", 2)];
        let summaries = summarize_participants(&events);
        assert_eq!(summaries.len(), 2);
        let names: Vec<_> = summaries.iter().map(|s| s.nickname.as_str()).collect();
        assert!(names.contains(&"Alice"));
        assert!(names.contains(&"alice"));
    }

    #[test]
    fn ranking_is_by_count_descending() {
        let events = vec![
            event("quiet", 1),
            event("busy", 2),
            event("busy", 3),
            event("busy", -1),
            event("mid", 0),
            event("mid", 4),
        ];
        let summaries = summarize_participants(&events);
        let names: Vec<_> = summaries.iter().map(|s| s.nickname.as_str()).collect();
        assert_eq!(names, vec!["busy", "mid", "quiet"]);
    }

    #[test]
    fn ties_keep_first_appearance_order() {
        let events = vec![
            event("second", 1),
            event("first", 1),
            event("second", 2),
            event("first", 2),
        ];
        // "second" appears before "first" in the log
        let summaries = summarize_participants(&events);
        let names: Vec<_> = summaries.iter().map(|s| s.nickname.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn sample_is_capped_at_first_five_entries() {
        let events: Vec<_> = (0..8).map(|i| event("a", i % 3)).collect();
        let summaries = summarize_participants(&events);
        assert_eq!(summaries[0].count, 8);
        assert_eq!(summaries[0].entries.len(), SAMPLE_LIMIT);
        // The sample is the head of the group, not the tail
        assert_eq!(summaries[0].entries[0].mood_score, 0);
    }

    #[test]
    fn trend_uses_scores_in_arrival_order() {
        let events = vec![
            event("a", 1),
            event("a", 1),
            event("a", 1),
            event("a", 4),
            event("a", 4),
            event("a", 4),
        ];
        let summaries = summarize_participants(&events);
        assert_eq!(summaries[0].trend, Trend::Rising);
        assert!((summaries[0].average_score - 2.5).abs() < 1e-12);
    }
}
