//! Session-level descriptive statistics.

use crate::types::MoodEvent;
use serde::Serialize;
use std::collections::HashSet;

/// Aggregate statistics over one session's event log.
///
/// Recomputed from the full log on every request; `average` and the rates
/// keep full floating precision, rounding is a presentation concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    /// Number of events
    pub total: usize,
    /// Number of distinct nicknames
    pub participants: usize,
    /// Arithmetic mean score
    pub average: f64,
    /// Highest score seen
    pub max: i32,
    /// Lowest score seen
    pub min: i32,
    /// Events with score > 0
    pub positive: usize,
    /// Events with score < 0
    pub negative: usize,
    /// Events with score == 0
    pub neutral: usize,
    /// Positive events as a percentage of total
    pub positive_rate: f64,
    /// Negative events as a percentage of total
    pub negative_rate: f64,
}

/// Compute [`SessionStats`] over an event sequence.
///
/// An empty sequence yields the all-zero value; the zero branch is
/// explicit so no division by zero ever happens.
pub fn compute_stats(events: &[MoodEvent]) -> SessionStats {
    if events.is_empty() {
        return SessionStats::default();
    }

    let participants = events
        .iter()
        .map(|e| e.nickname.as_str())
        .collect::<HashSet<_>>()
        .len();

    let mut sum: i64 = 0;
    let mut max = i32::MIN;
    let mut min = i32::MAX;
    let mut positive = 0;
    let mut negative = 0;
    let mut neutral = 0;

    for event in events {
        let score = event.mood_score;
        sum += score as i64;
        max = max.max(score);
        min = min.min(score);
        match score.cmp(&0) {
            std::cmp::Ordering::Greater => positive += 1,
            std::cmp::Ordering::Less => negative += 1,
            std::cmp::Ordering::Equal => neutral += 1,
        }
    }

    let total = events.len();

    SessionStats {
        total,
        participants,
        average: sum as f64 / total as f64,
        max,
        min,
        positive,
        negative,
        neutral,
        positive_rate: positive as f64 / total as f64 * 100.0,
        negative_rate: negative as f64 / total as f64 * 100.0,
    }
}
