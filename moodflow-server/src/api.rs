//! HTTP API for MoodFlow
//!
//! Endpoints:
//! - POST /api/mood - Submit a mood event
//! - GET /api/session/:id - Fetch a session's events (bearer required)
//! - POST /api/slides - Generate the meeting deck (bearer required)
//! - POST /api/admin/login - Admin credential check
//! - GET /health - Health check
//!
//! Every response uses the `{ "success": bool, … }` envelope the frontend
//! expects; CORS is wide open because submissions come from arbitrary
//! meeting-room browsers.

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use moodflow_core::insight::InsightClient;
use moodflow_core::slides::DeckRenderer;
use moodflow_core::types::{MoodEvent, NewMoodEvent};
use moodflow_core::{generate_report, Error, EventStore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub narrator: Arc<dyn InsightClient>,
    pub renderer: Arc<dyn DeckRenderer>,
    /// Expected admin password; login always fails when unset
    pub admin_password: Option<String>,
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/mood", post(submit_mood))
        .route("/api/session/:id", get(get_session_data))
        .route("/api/slides", post(generate_slides))
        .route("/api/admin/login", post(admin_login))
        .layer(cors)
        .with_state(state)
}

// ============================================
// Request / response types
// ============================================

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Submit mood response
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

/// Session data response
#[derive(Debug, Serialize)]
pub struct SessionDataResponse {
    pub success: bool,
    pub data: Vec<MoodEvent>,
}

/// Generate slides request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSlidesRequest {
    pub session_id: String,
}

/// Generate slides response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlidesResponse {
    pub success: bool,
    pub presentation_id: String,
    pub slide_url: String,
}

/// Admin login request
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub password: String,
}

/// Admin login response
#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub success: bool,
    pub token: String,
}

// ============================================
// Error envelope
// ============================================

/// API-level error carrying its HTTP status
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn unauthorized(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let status = match &error {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "success": false,
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Require a bearer token to be present.
///
/// Presence-only, matching the upstream behavior: tokens are minted by
/// the admin login and never persisted server-side.
fn require_bearer(headers: &HeaderMap) -> Result<(), ApiError> {
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("Bearer "))
        .unwrap_or(false);

    if authorized {
        Ok(())
    } else {
        Err(ApiError::unauthorized("authentication required"))
    }
}

// ============================================
// Handlers
// ============================================

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Submit one mood event
async fn submit_mood(
    State(state): State<Arc<AppState>>,
    Json(event): Json<NewMoodEvent>,
) -> Result<Json<SubmitResponse>, ApiError> {
    event.validate()?;

    let timestamp = state.store.append_event(&event).await?;

    Ok(Json(SubmitResponse {
        success: true,
        timestamp,
    }))
}

/// Fetch a session's events
async fn get_session_data(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SessionDataResponse>, ApiError> {
    require_bearer(&headers)?;

    let data = state.store.session_events(&session_id).await?;

    Ok(Json(SessionDataResponse {
        success: true,
        data,
    }))
}

/// Generate the meeting deck for a session
async fn generate_slides(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<GenerateSlidesRequest>,
) -> Result<Json<SlidesResponse>, ApiError> {
    require_bearer(&headers)?;

    if request.session_id.trim().is_empty() {
        return Err(Error::Validation("sessionId is required".to_string()).into());
    }

    let (_, rendered) = generate_report(
        state.store.as_ref(),
        state.narrator.as_ref(),
        state.renderer.as_ref(),
        &request.session_id,
    )
    .await?;

    Ok(Json(SlidesResponse {
        success: true,
        presentation_id: rendered.presentation_id,
        slide_url: rendered.slide_url,
    }))
}

/// Admin credential check
async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    if request.password.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "password is required",
        ));
    }

    let expected = state.admin_password.as_deref().ok_or_else(|| {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "admin password is not configured",
        )
    })?;

    if request.password != expected {
        return Err(ApiError::unauthorized("incorrect password"));
    }

    Ok(Json(AdminLoginResponse {
        success: true,
        token: mint_token(),
    }))
}

/// Mint an opaque session token.
///
/// Tokens are not stored; downstream routes only check bearer presence.
fn mint_token() -> String {
    let mut hasher = Sha256::new();
    hasher.update(uuid::Uuid::new_v4().as_bytes());
    hasher.update(Utc::now().timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    hex::encode(hasher.finalize())
}
