//! HTTP client for the Sheets values API.
//!
//! Talks to the spreadsheet holding the event log through the plain
//! values endpoints (`values/{range}`, `values/{range}:append`). Auth is a
//! bearer token from config or the `GOOGLE_ACCESS_TOKEN` environment
//! variable; token refresh is outside this client's scope.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;

use crate::config::SheetsConfig;
use crate::error::{Error, Result};
use crate::types::{MoodEvent, NewMoodEvent};

use super::{decode_row, encode_row, EventStore, HEADER_ROW};

/// HTTP client for the spreadsheet event log.
pub struct SheetsClient {
    config: SheetsConfig,
    http_client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
}

impl SheetsClient {
    /// Create a new client from configuration.
    ///
    /// Returns an error if the configuration is missing required fields.
    pub fn new(config: SheetsConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config
            .endpoint
            .clone()
            .unwrap_or_else(|| SheetsConfig::DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        let spreadsheet_id = config
            .spreadsheet_id
            .clone()
            .ok_or_else(|| Error::Config("sheets.spreadsheet_id is required".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = config.resolved_token() {
            let auth_value = format!("Bearer {}", token);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| Error::Config(format!("invalid access_token: {}", e)))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            base_url,
            spreadsheet_id,
        })
    }

    fn data_range(&self) -> String {
        format!("{}!A:F", self.config.worksheet)
    }

    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{}",
            self.base_url,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range),
            suffix
        )
    }

    fn request_failed(stage: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(format!("{stage} timed out: {e}"))
        } else {
            Error::Sheets(format!("{stage} failed: {e}"))
        }
    }

    /// Read every data row of the worksheet, skipping the header.
    async fn read_rows(&self) -> Result<Vec<MoodEvent>> {
        let url = self.values_url(&self.data_range(), "");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::request_failed("sheets read", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(Error::Sheets(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Sheets(format!("failed to parse response: {}", e)))?;

        let rows = body
            .get("values")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut events = Vec::new();
        for (i, row) in rows.iter().enumerate().skip(1) {
            let cells = row.as_array().cloned().unwrap_or_default();
            match decode_row(&cells) {
                Some(event) => events.push(event),
                None => {
                    tracing::warn!(row = i + 1, "Skipping sheet row with unreadable timestamp")
                }
            }
        }

        Ok(events)
    }

    /// Append one encoded row.
    async fn append_row(&self, row: &[String]) -> Result<()> {
        let url = self.values_url(&self.data_range(), ":append?valueInputOption=RAW");

        let response = self
            .http_client
            .post(&url)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| Self::request_failed("sheets append", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(Error::Sheets(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        Ok(())
    }

    /// Write the header row (first-time setup).
    pub async fn initialize(&self) -> Result<()> {
        let range = format!("{}!A1:F1", self.config.worksheet);
        let url = self.values_url(&range, "?valueInputOption=RAW");

        let response = self
            .http_client
            .put(&url)
            .json(&json!({ "values": [HEADER_ROW] }))
            .send()
            .await
            .map_err(|e| Self::request_failed("sheets initialize", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(Error::Sheets(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        tracing::info!(worksheet = self.config.worksheet, "Initialized event sheet");
        Ok(())
    }

    /// Run an operation with retry on transient failures.
    ///
    /// Retries 5xx, timeout and connection errors with exponential backoff.
    async fn with_retry<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;
        let mut delay = Duration::from_millis(500);

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::debug!(
                    "Retrying sheets call (attempt {}/{}), waiting {:?}",
                    attempt + 1,
                    self.config.max_retries + 1,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_secs(30));
            }

            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if is_retryable_error(&e) {
                        tracing::warn!("Transient sheets error: {}", e);
                        last_error = Some(e);
                        continue;
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Sheets("max retries exceeded".to_string())))
    }
}

#[async_trait]
impl EventStore for SheetsClient {
    async fn append_event(&self, event: &NewMoodEvent) -> Result<DateTime<Utc>> {
        let timestamp = Utc::now();
        let row = encode_row(event, timestamp);

        self.with_retry(|| self.append_row(&row)).await?;

        tracing::info!(
            session_id = event.session_id,
            nickname = event.nickname,
            score = event.mood_score,
            "Appended mood event"
        );

        Ok(timestamp)
    }

    async fn session_events(&self, session_id: &str) -> Result<Vec<MoodEvent>> {
        let events = self.with_retry(|| self.read_rows()).await?;
        Ok(events
            .into_iter()
            .filter(|e| e.session_id == session_id)
            .collect())
    }

    async fn all_events(&self) -> Result<Vec<MoodEvent>> {
        self.with_retry(|| self.read_rows()).await
    }
}

/// Check if an error is retryable (transient)
fn is_retryable_error(error: &Error) -> bool {
    match error {
        Error::Timeout(_) => true,
        Error::Sheets(msg) => {
            // Retry on 5xx errors and network-level failures
            msg.contains("API error (5") || msg.contains("connection") || msg.contains("failed:")
        }
        _ => false,
    }
}
