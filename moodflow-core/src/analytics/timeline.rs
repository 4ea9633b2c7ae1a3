//! Chronological bucketing of a session's events.

use crate::types::MoodEvent;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Fixed bucket width in minutes.
pub const BUCKET_MINUTES: i64 = 5;

/// One non-empty time window of the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBucket {
    /// Window start (inclusive)
    pub start_time: DateTime<Utc>,
    /// Window end (exclusive)
    pub end_time: DateTime<Utc>,
    /// Mean score over the window
    pub avg_score: f64,
    /// Number of events in the window
    pub count: usize,
}

/// Partition a session's events into fixed-width chronological buckets.
///
/// Events are sorted by timestamp into a copy, then a contiguous sweep of
/// half-open `[t, t + 5min)` windows runs from the first event's timestamp
/// through the last event's, so each event lands in exactly one window.
/// Windows with no events are skipped, which means the output sequence can
/// have gaps even though the sweep itself is contiguous. Empty input
/// yields an empty bucket list.
pub fn bucket_timeline(events: &[MoodEvent]) -> Vec<TimelineBucket> {
    let mut sorted: Vec<&MoodEvent> = events.iter().collect();
    sorted.sort_by_key(|e| e.timestamp);

    let mut buckets = Vec::new();
    let (first, last) = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (first.timestamp, last.timestamp),
        _ => return buckets,
    };

    let width = Duration::minutes(BUCKET_MINUTES);
    let mut window_start = first;

    while window_start <= last {
        let window_end = window_start + width;

        let mut sum: i64 = 0;
        let mut count = 0usize;
        for event in &sorted {
            if event.timestamp >= window_start && event.timestamp < window_end {
                sum += event.mood_score as i64;
                count += 1;
            }
        }

        if count > 0 {
            buckets.push(TimelineBucket {
                start_time: window_start,
                end_time: window_end,
                avg_score: sum as f64 / count as f64,
                count,
            });
        }

        window_start = window_end;
    }

    buckets
}
