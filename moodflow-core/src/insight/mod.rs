//! Insight narrator boundary.
//!
//! The narrator turns a session's statistics plus its comment digest into
//! a structured narrative. The model call itself is an opaque collaborator
//! behind [`InsightClient`]; a failed or unparseable call fails the whole
//! report request, there is no partial fallback.

use crate::analytics::SessionStats;
use crate::config::{LlmConfig, LlmProvider};
use crate::error::{Error, Result};
use crate::types::MoodEvent;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are a meeting analysis expert. You extract \
important insights from participant sentiment data and provide constructive \
feedback.";

/// Structured narrative returned by the narrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingInsights {
    /// One-sentence read on the meeting's overall mood
    pub overall_mood: String,
    /// Ordered list of key insights
    pub key_insights: Vec<String>,
    /// Ordered list of positive highlights
    pub positive_highlights: Vec<String>,
    /// Ordered list of concerns, possibly empty
    #[serde(default)]
    pub concerns: Vec<String>,
    /// Description of participant engagement
    pub participant_engagement: String,
    /// Ordered list of recommended actions
    pub recommendations: Vec<String>,
}

/// LLM completion interface for the narrator.
#[async_trait]
pub trait InsightClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Analyze a session's events and return the structured narrative.
///
/// Rejects an empty event set up front; any client failure or unparseable
/// reply propagates as [`Error::Insight`].
pub async fn analyze_meeting(
    stats: &SessionStats,
    events: &[MoodEvent],
    client: &dyn InsightClient,
) -> Result<MeetingInsights> {
    if events.is_empty() {
        return Err(Error::Validation("no data to analyze".to_string()));
    }

    let digest = comment_digest(events);
    let prompt = build_prompt(stats, &digest);

    tracing::debug!(
        session_id = events[0].session_id,
        comments = digest.lines().count(),
        "Requesting meeting insights"
    );

    let raw = client.complete(&prompt).await?;
    parse_insights(&raw)
}

/// Newline-joined digest of every event that carries a comment.
///
/// One line per commented event: `[nickname] (score: N) comment`.
pub fn comment_digest(events: &[MoodEvent]) -> String {
    events
        .iter()
        .filter(|e| !e.comment.trim().is_empty())
        .map(|e| format!("[{}] (score: {}) {}", e.nickname, e.mood_score, e.comment))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the narrator prompt from the stats block and comment digest.
pub fn build_prompt(stats: &SessionStats, digest: &str) -> String {
    format!(
        "Below are the sentiment scores and comments participants submitted \
during a meeting.\nAnalyze this meeting and extract the important insights.\n\n\
# Statistics\n\
- Total entries: {}\n\
- Participants: {}\n\
- Average sentiment score: {:.2} (scale of -5 to +5)\n\
- Positive entries: {} ({:.1}%)\n\
- Negative entries: {} ({:.1}%)\n\n\
# Comments\n\
{}\n\n\
Return the analysis as JSON in this shape:\n\
{{\n\
  \"overallMood\": \"the meeting's overall mood in one sentence\",\n\
  \"keyInsights\": [\"key insight 1\", \"key insight 2\", \"key insight 3\"],\n\
  \"positiveHighlights\": [\"positive point 1\", \"positive point 2\"],\n\
  \"concerns\": [\"concern 1\", \"concern 2\"],\n\
  \"participantEngagement\": \"how engaged the participants were\",\n\
  \"recommendations\": [\"recommended action 1\", \"recommended action 2\"]\n\
}}",
        stats.total,
        stats.participants,
        stats.average,
        stats.positive,
        stats.positive_rate,
        stats.negative,
        stats.negative_rate,
        digest
    )
}

fn parse_insights(raw: &str) -> Result<MeetingInsights> {
    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => value,
        Err(_) => {
            let extracted = extract_json_object(raw)?;
            serde_json::from_str::<serde_json::Value>(&extracted)?
        }
    };

    serde_json::from_value(value)
        .map_err(|e| Error::Insight(format!("narrative response has unexpected shape: {e}")))
}

fn extract_json_object(raw: &str) -> Result<String> {
    let start = raw
        .find('{')
        .ok_or_else(|| Error::Insight("narrative response did not contain JSON object".to_string()))?;
    let end = raw
        .rfind('}')
        .ok_or_else(|| Error::Insight("narrative response did not contain JSON object".to_string()))?;
    if end <= start {
        return Err(Error::Insight(
            "narrative response JSON bounds are invalid".to_string(),
        ));
    }
    Ok(raw[start..=end].to_string())
}

/// HTTP-backed narrator client.
pub struct HttpInsightClient {
    model: String,
    provider: LlmProvider,
    endpoint: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl HttpInsightClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| config.provider.default_endpoint().to_string());
        let api_key = match config.provider {
            LlmProvider::Ollama => None,
            LlmProvider::Claude => config
                .api_key
                .clone()
                .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok()),
            LlmProvider::OpenAI => config
                .api_key
                .clone()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok()),
        };

        if matches!(config.provider, LlmProvider::Claude | LlmProvider::OpenAI) && api_key.is_none()
        {
            return Err(Error::Config(
                "llm.api_key (or provider env var) is required".to_string(),
            ));
        }

        let timeout_secs = config.timeout_secs.max(1);
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Insight(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            model: config.model.clone(),
            provider: config.provider,
            endpoint,
            api_key,
            http,
        })
    }

    fn request_failed(stage: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(format!("{stage} timed out: {e}"))
        } else {
            Error::Insight(format!("{stage} failed: {e}"))
        }
    }
}

#[async_trait]
impl InsightClient for HttpInsightClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        match self.provider {
            LlmProvider::Ollama => {
                let url = format!("{}/api/generate", self.endpoint.trim_end_matches('/'));
                let resp = self
                    .http
                    .post(url)
                    .json(&json!({
                        "model": self.model,
                        "prompt": prompt,
                        "stream": false,
                    }))
                    .send()
                    .await
                    .map_err(|e| Self::request_failed("ollama request", e))?;
                let status = resp.status();
                let body = resp
                    .text()
                    .await
                    .map_err(|e| Self::request_failed("ollama read body", e))?;
                if !status.is_success() {
                    return Err(Error::Insight(format!(
                        "ollama returned {}: {}",
                        status.as_u16(),
                        body
                    )));
                }
                let json: serde_json::Value = serde_json::from_str(&body)?;
                json.get("response")
                    .and_then(|v| v.as_str())
                    .map(ToString::to_string)
                    .ok_or_else(|| {
                        Error::Insight("ollama response missing string field `response`".to_string())
                    })
            }
            LlmProvider::Claude => {
                let url = format!("{}/v1/messages", self.endpoint.trim_end_matches('/'));
                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                headers.insert(
                    "x-api-key",
                    HeaderValue::from_str(self.api_key.as_deref().unwrap_or_default())
                        .map_err(|e| Error::Insight(format!("invalid claude api key header: {e}")))?,
                );
                headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));

                let resp = self
                    .http
                    .post(url)
                    .headers(headers)
                    .json(&json!({
                        "model": self.model,
                        "max_tokens": 1024,
                        "temperature": 0.7,
                        "system": SYSTEM_PROMPT,
                        "messages": [{ "role": "user", "content": prompt }],
                    }))
                    .send()
                    .await
                    .map_err(|e| Self::request_failed("claude request", e))?;
                let status = resp.status();
                let body = resp
                    .text()
                    .await
                    .map_err(|e| Self::request_failed("claude read body", e))?;
                if !status.is_success() {
                    return Err(Error::Insight(format!(
                        "claude returned {}: {}",
                        status.as_u16(),
                        body
                    )));
                }
                let json: serde_json::Value = serde_json::from_str(&body)?;
                json.get("content")
                    .and_then(|v| v.as_array())
                    .and_then(|arr| arr.first())
                    .and_then(|v| v.get("text"))
                    .and_then(|v| v.as_str())
                    .map(ToString::to_string)
                    .ok_or_else(|| {
                        Error::Insight("claude response missing content[0].text".to_string())
                    })
            }
            LlmProvider::OpenAI => {
                let url = format!(
                    "{}/v1/chat/completions",
                    self.endpoint.trim_end_matches('/')
                );
                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!(
                        "Bearer {}",
                        self.api_key.as_deref().unwrap_or_default()
                    ))
                    .map_err(|e| Error::Insight(format!("invalid auth header: {e}")))?,
                );

                let resp = self
                    .http
                    .post(url)
                    .headers(headers)
                    .json(&json!({
                        "model": self.model,
                        "temperature": 0.7,
                        "response_format": { "type": "json_object" },
                        "messages": [
                            { "role": "system", "content": SYSTEM_PROMPT },
                            { "role": "user", "content": prompt }
                        ]
                    }))
                    .send()
                    .await
                    .map_err(|e| Self::request_failed("openai request", e))?;
                let status = resp.status();
                let body = resp
                    .text()
                    .await
                    .map_err(|e| Self::request_failed("openai read body", e))?;
                if !status.is_success() {
                    return Err(Error::Insight(format!(
                        "openai returned {}: {}",
                        status.as_u16(),
                        body
                    )));
                }
                let json: serde_json::Value = serde_json::from_str(&body)?;
                json.get("choices")
                    .and_then(|v| v.as_array())
                    .and_then(|arr| arr.first())
                    .and_then(|v| v.get("message"))
                    .and_then(|v| v.get("content"))
                    .and_then(|v| v.as_str())
                    .map(ToString::to_string)
                    .ok_or_else(|| {
                        Error::Insight(
                            "openai response missing choices[0].message.content".to_string(),
                        )
                    })
            }
        }
    }
}
