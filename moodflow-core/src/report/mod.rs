//! Report orchestration.
//!
//! Ties the pipeline together: event log → aggregates → narrator → deck
//! blocks → renderer. A report either fully succeeds or fails; aggregator
//! outputs are never returned as a substitute for a failed narrative, and
//! no partial deck is produced.

use crate::analytics::{
    bucket_timeline, compute_stats, summarize_participants, ParticipantSummary, SessionStats,
    TimelineBucket,
};
use crate::error::{Error, Result};
use crate::insight::{analyze_meeting, InsightClient, MeetingInsights};
use crate::sheets::EventStore;
use crate::slides::{build_deck, DeckRenderer, RenderedDeck, SlideBlock};
use crate::types::MoodEvent;
use serde::Serialize;

/// Everything derived from one session's event log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingReport {
    pub session_id: String,
    pub stats: SessionStats,
    pub participants: Vec<ParticipantSummary>,
    pub timeline: Vec<TimelineBucket>,
    pub insights: MeetingInsights,
    pub deck: Vec<SlideBlock>,
}

/// Build the full report for an already-loaded event log.
///
/// The narrator call is the only non-deterministic step; its failure
/// aborts the report.
pub async fn build_report(
    session_id: &str,
    events: &[MoodEvent],
    narrator: &dyn InsightClient,
) -> Result<MeetingReport> {
    if events.is_empty() {
        return Err(Error::Validation(format!(
            "no events recorded for session {}",
            session_id
        )));
    }

    let stats = compute_stats(events);
    let insights = analyze_meeting(&stats, events, narrator).await?;
    let participants = summarize_participants(events);
    let timeline = bucket_timeline(events);
    let deck = build_deck(session_id, &stats, &participants, &timeline, &insights);

    Ok(MeetingReport {
        session_id: session_id.to_string(),
        stats,
        participants,
        timeline,
        insights,
        deck,
    })
}

/// Generate and render the deck for a session.
///
/// Reads the session's events from the store, builds the report and hands
/// the deck blocks to the renderer. Every failure along the way aborts
/// the whole request.
pub async fn generate_report(
    store: &dyn EventStore,
    narrator: &dyn InsightClient,
    renderer: &dyn DeckRenderer,
    session_id: &str,
) -> Result<(MeetingReport, RenderedDeck)> {
    let events = store.session_events(session_id).await?;

    tracing::info!(
        session_id,
        events = events.len(),
        "Generating meeting report"
    );

    let report = build_report(session_id, &events, narrator).await?;

    let deck_title = format!("MoodFlow Analysis - {}", session_id);
    let rendered = renderer.render(&deck_title, &report.deck).await?;

    tracing::info!(
        session_id,
        presentation_id = rendered.presentation_id,
        "Meeting report rendered"
    );

    Ok((report, rendered))
}
