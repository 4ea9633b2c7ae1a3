//! Participant trend classification.
//!
//! A trend is a coarse directional read on one participant's scores over
//! the session: the mean of the second half of the sequence is compared to
//! the mean of the first half against a fixed threshold.

use serde::{Deserialize, Serialize};

/// Mean-difference threshold separating rising/falling from stable.
pub const TREND_THRESHOLD: f64 = 0.5;

/// Directional classification of a participant's scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
        }
    }

    /// Emoji used when rendering the trend in reports.
    pub fn emoji(&self) -> &'static str {
        match self {
            Trend::Rising => "📈",
            Trend::Falling => "📉",
            Trend::Stable => "➡️",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a chronologically ordered score sequence.
///
/// Fewer than two scores are always [`Trend::Stable`]. Otherwise the
/// sequence splits at `len / 2` (the first half gets the smaller share on
/// odd lengths) and the signed difference of half means decides:
/// above `+TREND_THRESHOLD` is rising, below `-TREND_THRESHOLD` is
/// falling, anything in between is stable.
pub fn classify_trend(scores: &[i32]) -> Trend {
    if scores.len() < 2 {
        return Trend::Stable;
    }

    let mid = scores.len() / 2;
    let first_avg = mean(&scores[..mid]);
    let second_avg = mean(&scores[mid..]);
    let diff = second_avg - first_avg;

    if diff > TREND_THRESHOLD {
        Trend::Rising
    } else if diff < -TREND_THRESHOLD {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

fn mean(scores: &[i32]) -> f64 {
    // Callers guarantee non-empty halves (mid >= 1 when len >= 2)
    scores.iter().map(|s| *s as f64).sum::<f64>() / scores.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_sequences_are_stable() {
        assert_eq!(classify_trend(&[]), Trend::Stable);
        assert_eq!(classify_trend(&[5]), Trend::Stable);
    }

    #[test]
    fn rising_when_second_half_mean_exceeds_threshold() {
        assert_eq!(classify_trend(&[1, 1, 1, 4, 4, 4]), Trend::Rising);
    }

    #[test]
    fn falling_when_second_half_mean_drops_below_threshold() {
        assert_eq!(classify_trend(&[4, 4, 4, 1, 1, 1]), Trend::Falling);
    }

    #[test]
    fn stable_when_difference_within_threshold() {
        // Halves [1,2] and [1,2] have identical means
        assert_eq!(classify_trend(&[1, 2, 1, 2]), Trend::Stable);
    }

    #[test]
    fn threshold_is_exclusive() {
        // First half [0], second half [0, 1]: diff is exactly 0.5
        assert_eq!(classify_trend(&[0, 0, 1]), Trend::Stable);
        // diff of -0.5 likewise
        assert_eq!(classify_trend(&[1, 1, 0]), Trend::Stable);
    }

    #[test]
    fn odd_lengths_give_first_half_the_smaller_share() {
        // mid = 2: halves [0, 0] and [3, 3, 3], diff 3.0
        assert_eq!(classify_trend(&[0, 0, 3, 3, 3]), Trend::Rising);
    }

    #[test]
    fn classification_is_deterministic() {
        let scores = [2, -1, 0, 3, 4, -2, 1];
        assert_eq!(classify_trend(&scores), classify_trend(&scores));
    }
}
