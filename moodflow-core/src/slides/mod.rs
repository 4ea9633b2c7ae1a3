//! Slide-deck assembly.
//!
//! [`build_deck`] turns the aggregator outputs plus the narrator's
//! insights into an ordered sequence of content blocks. Rendering those
//! blocks into an actual presentation is the [`DeckRenderer`]
//! collaborator's job (see [`SlidesClient`]); the block sequence is the
//! contract between the two.

mod client;

pub use client::SlidesClient;

use crate::analytics::{ParticipantSummary, SessionStats, TimelineBucket};
use crate::error::Result;
use crate::insight::MeetingInsights;
use async_trait::async_trait;
use serde::Serialize;

/// Participants shown on the breakdown slide.
pub const MAX_PARTICIPANT_ROWS: usize = 8;

/// One slide's worth of content: a title and a body text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideBlock {
    pub title: String,
    pub body: String,
}

/// Handle to a rendered deck.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDeck {
    pub presentation_id: String,
    pub slide_url: String,
}

/// Renders slide blocks into a shareable presentation.
#[async_trait]
pub trait DeckRenderer: Send + Sync {
    async fn render(&self, title: &str, blocks: &[SlideBlock]) -> Result<RenderedDeck>;
}

/// Assemble the deck content for one session.
///
/// Block order: title, summary, statistics, participants (top
/// [`MAX_PARTICIPANT_ROWS`] by the aggregator's ranking), timeline
/// (omitted entirely when there are no buckets), insights and
/// recommendations. Rounding happens here and only here: means to two
/// decimals, rates to one.
pub fn build_deck(
    session_id: &str,
    stats: &SessionStats,
    participants: &[ParticipantSummary],
    timeline: &[TimelineBucket],
    insights: &MeetingInsights,
) -> Vec<SlideBlock> {
    let mut blocks = vec![
        title_block(session_id, stats),
        summary_block(insights),
        stats_block(stats),
        participants_block(participants),
    ];

    if !timeline.is_empty() {
        blocks.push(timeline_block(timeline));
    }

    blocks.push(recommendations_block(insights));
    blocks
}

fn title_block(session_id: &str, stats: &SessionStats) -> SlideBlock {
    SlideBlock {
        title: "🌊 MoodFlow Meeting Report".to_string(),
        body: format!(
            "Session: {}\nTotal entries: {} | Participants: {}\nAverage score: {:.2}",
            session_id, stats.total, stats.participants, stats.average
        ),
    }
}

fn summary_block(insights: &MeetingInsights) -> SlideBlock {
    let numbered: Vec<String> = insights
        .key_insights
        .iter()
        .enumerate()
        .map(|(i, insight)| format!("{}. {}", i + 1, insight))
        .collect();

    SlideBlock {
        title: "📊 Meeting Summary".to_string(),
        body: format!(
            "Overall mood\n{}\n\nKey insights\n{}",
            insights.overall_mood,
            numbered.join("\n")
        ),
    }
}

fn stats_block(stats: &SessionStats) -> SlideBlock {
    SlideBlock {
        title: "📊 Statistics".to_string(),
        body: format!(
            "📈 Total entries: {}\n\n👥 Participants: {}\n\n💬 Average score: {:.2}\n\n\
             😊 Positive: {} ({:.1}%)\n\n😢 Negative: {} ({:.1}%)\n\n😐 Neutral: {}",
            stats.total,
            stats.participants,
            stats.average,
            stats.positive,
            stats.positive_rate,
            stats.negative,
            stats.negative_rate,
            stats.neutral
        ),
    }
}

fn participants_block(participants: &[ParticipantSummary]) -> SlideBlock {
    let rows: Vec<String> = participants
        .iter()
        .take(MAX_PARTICIPANT_ROWS)
        .map(|p| {
            format!(
                "{}: {} entries (avg {:.1}) {}",
                p.nickname,
                p.count,
                p.average_score,
                p.trend.emoji()
            )
        })
        .collect();

    SlideBlock {
        title: "👥 Participant Breakdown".to_string(),
        body: rows.join("\n"),
    }
}

fn timeline_block(timeline: &[TimelineBucket]) -> SlideBlock {
    let rows: Vec<String> = timeline
        .iter()
        .map(|bucket| {
            format!(
                "{}: {:.2} ({} entries)",
                bucket.start_time.format("%H:%M"),
                bucket.avg_score,
                bucket.count
            )
        })
        .collect();

    SlideBlock {
        title: "⏱️ Timeline".to_string(),
        body: rows.join("\n"),
    }
}

fn recommendations_block(insights: &MeetingInsights) -> SlideBlock {
    let bullets = |items: &[String]| {
        items
            .iter()
            .map(|item| format!("• {}", item))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut body = format!(
        "✅ Positive highlights\n{}\n\n",
        bullets(&insights.positive_highlights)
    );

    if !insights.concerns.is_empty() {
        body.push_str(&format!("⚠️ Concerns\n{}\n\n", bullets(&insights.concerns)));
    }

    body.push_str(&format!(
        "🎯 Recommended actions\n{}",
        bullets(&insights.recommendations)
    ));

    SlideBlock {
        title: "💡 Insights & Recommended Actions".to_string(),
        body,
    }
}
