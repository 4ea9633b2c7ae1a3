//! Analytics pipeline for moodflow
//!
//! Turns a session's flat event log into derived aggregates:
//! - Descriptive statistics ([`compute_stats`])
//! - Per-participant summaries with trend classification
//!   ([`summarize_participants`])
//! - Fixed-width chronological buckets ([`bucket_timeline`])
//!
//! All of these are pure functions of the event log: no shared state, no
//! I/O, recomputed fresh on every request. The narrator and deck renderer
//! downstream consume their outputs (see [`crate::insight`] and
//! [`crate::slides`]).

pub mod participants;
pub mod stats;
pub mod timeline;
pub mod trend;

pub use participants::{summarize_participants, ParticipantSummary, SAMPLE_LIMIT};
pub use stats::{compute_stats, SessionStats};
pub use timeline::{bucket_timeline, TimelineBucket, BUCKET_MINUTES};
pub use trend::{classify_trend, Trend, TREND_THRESHOLD};
