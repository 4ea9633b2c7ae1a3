//! moodflow-report - Meeting Report CLI
//!
//! Print a session's mood analytics to the terminal, export them as JSON
//! or Markdown, or drive the full narrator + slides pipeline.

use anyhow::{Context, Result};
use clap::Parser;
use moodflow_core::analytics::{
    bucket_timeline, compute_stats, summarize_participants, ParticipantSummary, SessionStats,
    TimelineBucket,
};
use moodflow_core::insight::HttpInsightClient;
use moodflow_core::slides::SlidesClient;
use moodflow_core::{generate_report, Config, EventStore, SheetsClient};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "moodflow-report")]
#[command(about = "MoodFlow - meeting mood reports")]
#[command(version)]
struct Args {
    /// Session to report on
    #[arg(long)]
    session: Option<String>,

    /// List known sessions instead of reporting
    #[arg(long)]
    list: bool,

    /// Write the worksheet header row (first-time setup)
    #[arg(long)]
    init_sheet: bool,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Generate the slide deck too (requires llm + slides config)
    #[arg(long)]
    slides: bool,

    /// Config file path (default: XDG config dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Analytics-only view of one session, used for exports.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionAnalytics {
    session_id: String,
    stats: SessionStats,
    participants: Vec<ParticipantSummary>,
    timeline: Vec<TimelineBucket>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path).context("failed to load configuration")?,
        None => Config::load().context("failed to load configuration")?,
    };
    let _log_guard = moodflow_core::logging::init(&config.logging).ok();

    let store = SheetsClient::new(config.sheets.clone()).context("failed to set up event store")?;

    if args.init_sheet {
        store.initialize().await.context("failed to initialize sheet")?;
        println!("Sheet initialized.");
        return Ok(());
    }

    if args.list {
        return list_sessions(&store).await;
    }

    let session_id = args
        .session
        .context("pass --session <id> (or --list to see known sessions)")?;

    let events = store
        .session_events(&session_id)
        .await
        .context("failed to read session events")?;

    if events.is_empty() {
        println!("No events recorded for session {}.", session_id);
        return Ok(());
    }

    if args.slides {
        let llm = config
            .llm
            .clone()
            .context("llm configuration is required for --slides")?;
        let narrator =
            HttpInsightClient::new(&llm).context("failed to set up insight narrator")?;
        let renderer = SlidesClient::new(config.slides.clone())
            .context("failed to set up slides renderer")?;

        let (report, rendered) = generate_report(&store, &narrator, &renderer, &session_id)
            .await
            .context("failed to generate the meeting report")?;

        println!("Deck ready: {}", rendered.slide_url);
        println!();
        println!("Overall mood: {}", report.insights.overall_mood);
        for recommendation in &report.insights.recommendations {
            println!("  → {}", recommendation);
        }
        return Ok(());
    }

    let analytics = SessionAnalytics {
        session_id: session_id.clone(),
        stats: compute_stats(&events),
        participants: summarize_participants(&events),
        timeline: bucket_timeline(&events),
    };

    match args.export.as_deref() {
        Some("json") => print_json(&analytics)?,
        Some("md") => print_markdown(&analytics),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&analytics),
    }

    Ok(())
}

async fn list_sessions(store: &dyn EventStore) -> Result<()> {
    let events = store.all_events().await.context("failed to read events")?;

    if events.is_empty() {
        println!("No events recorded yet.");
        return Ok(());
    }

    // Distinct sessions in first-seen order, with counts
    let mut sessions: Vec<(&str, usize)> = Vec::new();
    for event in &events {
        match sessions.iter_mut().find(|(id, _)| *id == event.session_id) {
            Some((_, count)) => *count += 1,
            None => sessions.push((&event.session_id, 1)),
        }
    }

    println!("{} session(s):", sessions.len());
    for (id, count) in sessions {
        println!("   {:<24} {} event(s)", id, count);
    }

    Ok(())
}

fn print_terminal(analytics: &SessionAnalytics) {
    let title = format!("🌊 MOODFLOW - {}", analytics.session_id);

    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    let stats = &analytics.stats;
    println!("📊 STATISTICS");
    println!(
        "   Entries: {:<10} Participants: {}",
        stats.total, stats.participants
    );
    println!(
        "   Average: {:<10.2} Range: {} to {}",
        stats.average, stats.min, stats.max
    );
    println!(
        "   😊 {} ({:.1}%)   😢 {} ({:.1}%)   😐 {}",
        stats.positive, stats.positive_rate, stats.negative, stats.negative_rate, stats.neutral
    );
    println!();

    println!("👥 PARTICIPANTS");
    for p in &analytics.participants {
        println!(
            "   {} {:<16} {:>3} entries  avg {:>5.1}",
            p.trend.emoji(),
            p.nickname,
            p.count,
            p.average_score
        );
    }
    println!();

    if !analytics.timeline.is_empty() {
        println!("⏱️ TIMELINE");
        for bucket in &analytics.timeline {
            println!(
                "   {}  {:>5.2}  ({} entries)",
                bucket.start_time.format("%H:%M"),
                bucket.avg_score,
                bucket.count
            );
        }
        println!();
    }
}

fn print_markdown(analytics: &SessionAnalytics) {
    println!("# MoodFlow Report: {}", analytics.session_id);
    println!();

    let stats = &analytics.stats;
    println!("## Statistics");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Entries | {} |", stats.total);
    println!("| Participants | {} |", stats.participants);
    println!("| Average score | {:.2} |", stats.average);
    println!("| Positive | {} ({:.1}%) |", stats.positive, stats.positive_rate);
    println!("| Negative | {} ({:.1}%) |", stats.negative, stats.negative_rate);
    println!("| Neutral | {} |", stats.neutral);
    println!();

    println!("## Participants");
    println!();
    for p in &analytics.participants {
        println!(
            "- **{}** - {} entries, avg {:.1} ({})",
            p.nickname, p.count, p.average_score, p.trend
        );
    }
    println!();

    if !analytics.timeline.is_empty() {
        println!("## Timeline");
        println!();
        for bucket in &analytics.timeline {
            println!(
                "- {} - avg {:.2} ({} entries)",
                bucket.start_time.format("%H:%M"),
                bucket.avg_score,
                bucket.count
            );
        }
        println!();
    }

    println!("---");
    println!("*Generated by moodflow-report*");
}

fn print_json(analytics: &SessionAnalytics) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(analytics)?);
    Ok(())
}
