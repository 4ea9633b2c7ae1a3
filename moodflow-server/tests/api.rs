//! Integration tests for the MoodFlow HTTP API
//!
//! The collaborators (event store, narrator, renderer) are swapped for
//! in-process fakes so the tests exercise routing, validation, auth
//! checks and the response envelopes.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, Utc};
use moodflow_core::insight::InsightClient;
use moodflow_core::slides::{DeckRenderer, RenderedDeck, SlideBlock};
use moodflow_core::types::{MoodEvent, NewMoodEvent};
use moodflow_core::{EventStore, Result};
use moodflow_server::api::{create_router, AppState};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

struct MemoryStore {
    events: Mutex<Vec<MoodEvent>>,
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn append_event(&self, event: &NewMoodEvent) -> Result<DateTime<Utc>> {
        let timestamp = Utc::now();
        self.events
            .lock()
            .unwrap()
            .push(event.clone().into_event(timestamp));
        Ok(timestamp)
    }

    async fn session_events(&self, session_id: &str) -> Result<Vec<MoodEvent>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn all_events(&self) -> Result<Vec<MoodEvent>> {
        Ok(self.events.lock().unwrap().clone())
    }
}

struct CannedNarrator;

#[async_trait]
impl InsightClient for CannedNarrator {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(r#"{
            "overallMood": "Calm",
            "keyInsights": ["steady meeting"],
            "positiveHighlights": ["no blockers"],
            "concerns": [],
            "participantEngagement": "even",
            "recommendations": ["nothing to change"]
        }"#
        .to_string())
    }
}

struct FakeRenderer;

#[async_trait]
impl DeckRenderer for FakeRenderer {
    async fn render(&self, _title: &str, _blocks: &[SlideBlock]) -> Result<RenderedDeck> {
        Ok(RenderedDeck {
            presentation_id: "pres-test".to_string(),
            slide_url: "https://docs.google.com/presentation/d/pres-test".to_string(),
        })
    }
}

fn test_router() -> axum::Router {
    let state = Arc::new(AppState {
        store: Arc::new(MemoryStore {
            events: Mutex::new(Vec::new()),
        }),
        narrator: Arc::new(CannedNarrator),
        renderer: Arc::new(FakeRenderer),
        admin_password: Some("hunter2".to_string()),
    });
    create_router(state)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_bearer(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", "Bearer test-token")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_router();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn submit_accepts_a_valid_event() {
    let app = test_router();

    let response = app
        .oneshot(post_json(
            "/api/mood",
            r#"{"sessionId": "s1", "nickname": "alice", "moodScore": 3, "comment": "good"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn submit_rejects_out_of_range_scores() {
    let app = test_router();

    let response = app
        .oneshot(post_json(
            "/api/mood",
            r#"{"sessionId": "s1", "nickname": "alice", "moodScore": 9}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("moodScore"));
}

#[tokio::test]
async fn submit_rejects_missing_nickname() {
    let app = test_router();

    let response = app
        .oneshot(post_json(
            "/api/mood",
            r#"{"sessionId": "s1", "nickname": "", "moodScore": 1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn session_data_requires_bearer() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/session/s1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn submitted_events_round_trip_through_session_fetch() {
    let app = test_router();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/mood",
            r#"{"sessionId": "s1", "nickname": "alice", "moodScore": -2, "emoticon": "😕"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A different session's event must not leak in
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/mood",
            r#"{"sessionId": "other", "nickname": "bob", "moodScore": 1}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/session/s1")
                .header("authorization", "Bearer test-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["nickname"], "alice");
    assert_eq!(data[0]["moodScore"], -2);
    assert_eq!(data[0]["emoticon"], "😕");
}

#[tokio::test]
async fn slides_require_bearer() {
    let app = test_router();

    let response = app
        .oneshot(post_json("/api/slides", r#"{"sessionId": "s1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn slides_fail_on_empty_session() {
    let app = test_router();

    let response = app
        .oneshot(post_json_bearer("/api/slides", r#"{"sessionId": "empty"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn slides_render_for_a_populated_session() {
    let app = test_router();

    for score in [-1, 2, 4] {
        let body = format!(
            r#"{{"sessionId": "retro", "nickname": "alice", "moodScore": {}, "comment": "note"}}"#,
            score
        );
        let response = app.clone().oneshot(post_json("/api/mood", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(post_json_bearer("/api/slides", r#"{"sessionId": "retro"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["presentationId"], "pres-test");
    assert!(json["slideUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://docs.google.com/presentation/d/"));
}

#[tokio::test]
async fn admin_login_checks_the_password() {
    let app = test_router();

    let response = app
        .clone()
        .oneshot(post_json("/api/admin/login", r#"{"password": "wrong"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(post_json("/api/admin/login", r#"{"password": ""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(post_json("/api/admin/login", r#"{"password": "hunter2"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["token"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn admin_login_fails_when_password_unset() {
    let state = Arc::new(AppState {
        store: Arc::new(MemoryStore {
            events: Mutex::new(Vec::new()),
        }),
        narrator: Arc::new(CannedNarrator),
        renderer: Arc::new(FakeRenderer),
        admin_password: None,
    });
    let app = create_router(state);

    let response = app
        .oneshot(post_json("/api/admin/login", r#"{"password": "anything"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
