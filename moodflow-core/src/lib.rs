//! # moodflow-core
//!
//! Core library for MoodFlow - meeting mood tracking and AI-generated
//! meeting reports.
//!
//! This library provides:
//! - Domain types for mood events and sessions
//! - The analytics pipeline (stats, trends, participants, timeline)
//! - The insight narrator and slide-deck collaborator boundaries
//! - The spreadsheet-backed event store
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! ```text
//! event log ──► Stats Aggregator ──► Insight Narrator ─┐
//!     │                 │                              │
//!     │                 ├─► Participant Aggregator ────┤
//!     │                 └─► Timeline Bucketer ─────────┤
//!     │                                                ▼
//!     └───────────────────────────────────────► Deck Builder ──► renderer
//! ```
//!
//! The aggregators are pure functions of the event log; the narrator and
//! the deck renderer are the only side-effecting steps, and either one
//! failing fails the whole report.

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use report::{build_report, generate_report, MeetingReport};
pub use sheets::{EventStore, SheetsClient};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod insight;
pub mod logging;
pub mod report;
pub mod sheets;
pub mod slides;
pub mod types;
