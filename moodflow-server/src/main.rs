//! moodflow-server - MoodFlow HTTP API
//!
//! Serves the mood-submission and report-generation API backed by the
//! spreadsheet event log, the insight narrator and the slides renderer.

use anyhow::{Context, Result};
use clap::Parser;
use moodflow_server::api::{self, AppState};
use moodflow_core::insight::HttpInsightClient;
use moodflow_core::slides::SlidesClient;
use moodflow_core::{Config, SheetsClient};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "moodflow-server")]
#[command(about = "MoodFlow meeting mood API server")]
#[command(version)]
struct Args {
    /// Bind address (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Config file path (default: XDG config dir)
    #[arg(long)]
    config: Option<PathBuf>,
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

    let llm = config
        .llm
        .clone()
        .context("llm configuration is required to generate reports")?;
    let narrator = HttpInsightClient::new(&llm).context("failed to set up insight narrator")?;

    let renderer =
        SlidesClient::new(config.slides.clone()).context("failed to set up slides renderer")?;

    let admin_password = config.server.resolved_admin_password();
    if admin_password.is_none() {
        tracing::warn!("No admin password configured; admin login will always fail");
    }

    let state = Arc::new(AppState {
        store: Arc::new(store),
        narrator: Arc::new(narrator),
        renderer: Arc::new(renderer),
        admin_password,
    });

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let router = api::create_router(state);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;

    tracing::info!(bind, "MoodFlow API listening");
    println!("🌊 MoodFlow API running on {}", bind);
    println!("  POST /api/mood        - Submit a mood event");
    println!("  GET  /api/session/:id - Fetch session data");
    println!("  POST /api/slides      - Generate the meeting deck");
    println!("  POST /api/admin/login - Admin login");
    println!("  GET  /health          - Health check");

    axum::serve(listener, router)
        .await
        .context("server error")?;

    Ok(())
}
