//! HTTP renderer for the Slides API.
//!
//! Creates a presentation, replaces its default slide with one slide per
//! content block, then makes the deck shareable through the Drive API.
//! The folder move and the anyone-with-link permission both follow the
//! upstream behavior of tolerating failure: the deck still counts as
//! rendered, the problem is logged.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;

use crate::config::SlidesConfig;
use crate::error::{Error, Result};

use super::{DeckRenderer, RenderedDeck, SlideBlock};

/// HTTP client for the slide-deck renderer.
pub struct SlidesClient {
    config: SlidesConfig,
    http_client: reqwest::Client,
    base_url: String,
    drive_url: String,
}

impl SlidesClient {
    /// Create a new renderer from configuration.
    pub fn new(config: SlidesConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config
            .endpoint
            .clone()
            .unwrap_or_else(|| SlidesConfig::DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        let drive_url = config
            .drive_endpoint
            .clone()
            .unwrap_or_else(|| SlidesConfig::DEFAULT_DRIVE_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

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
            drive_url,
        })
    }

    fn request_failed(stage: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(format!("{stage} timed out: {e}"))
        } else {
            Error::Slides(format!("{stage} failed: {e}"))
        }
    }

    async fn create_presentation(&self, title: &str) -> Result<(String, Vec<String>)> {
        let url = format!("{}/v1/presentations", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&json!({ "title": title }))
            .send()
            .await
            .map_err(|e| Self::request_failed("slides create", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(Error::Slides(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Slides(format!("failed to parse response: {}", e)))?;

        let presentation_id = body
            .get("presentationId")
            .and_then(|v| v.as_str())
            .map(ToString::to_string)
            .ok_or_else(|| Error::Slides("create response missing presentationId".to_string()))?;

        let default_slides = body
            .get("slides")
            .and_then(|v| v.as_array())
            .map(|slides| {
                slides
                    .iter()
                    .filter_map(|s| s.get("objectId").and_then(|v| v.as_str()))
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok((presentation_id, default_slides))
    }

    async fn batch_update(&self, presentation_id: &str, requests: &[serde_json::Value]) -> Result<()> {
        let url = format!(
            "{}/v1/presentations/{}:batchUpdate",
            self.base_url,
            urlencoding::encode(presentation_id)
        );

        let response = self
            .http_client
            .post(&url)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(|e| Self::request_failed("slides batch update", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(Error::Slides(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        Ok(())
    }

    /// Move the deck into the configured folder. Failure is tolerated.
    async fn move_to_folder(&self, presentation_id: &str, folder_id: &str) {
        let url = format!(
            "{}/drive/v3/files/{}?addParents={}&removeParents=root&fields=id,parents",
            self.drive_url,
            urlencoding::encode(presentation_id),
            urlencoding::encode(folder_id)
        );

        let result = self.http_client.patch(&url).json(&json!({})).send().await;
        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!(folder_id, "Moved deck into folder");
            }
            Ok(response) => {
                tracing::warn!(
                    folder_id,
                    status = response.status().as_u16(),
                    "Folder move rejected, leaving deck in root"
                );
            }
            Err(e) => {
                tracing::warn!(folder_id, error = %e, "Folder move failed, leaving deck in root");
            }
        }
    }

    /// Grant anyone-with-link read access. Failure is tolerated.
    async fn share_with_anyone(&self, presentation_id: &str) {
        let url = format!(
            "{}/drive/v3/files/{}/permissions",
            self.drive_url,
            urlencoding::encode(presentation_id)
        );

        let result = self
            .http_client
            .post(&url)
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                tracing::warn!(
                    status = response.status().as_u16(),
                    "Permission grant rejected, deck stays private"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Permission grant failed, deck stays private");
            }
        }
    }
}

/// Build the batch-update requests for a deck.
///
/// Deletes the presentation's default slides, then creates one slide per
/// block: the first block gets the TITLE layout (title + subtitle), the
/// rest TITLE_AND_BODY.
fn build_slide_requests(
    default_slides: &[String],
    blocks: &[SlideBlock],
) -> Vec<serde_json::Value> {
    let mut requests = Vec::new();

    for object_id in default_slides {
        requests.push(json!({ "deleteObject": { "objectId": object_id } }));
    }

    for (i, block) in blocks.iter().enumerate() {
        let slide_id = format!("slide_{}", i);
        let (layout, body_suffix) = if i == 0 {
            ("TITLE", "subtitle")
        } else {
            ("TITLE_AND_BODY", "body")
        };

        requests.push(json!({
            "createSlide": {
                "objectId": slide_id,
                "slideLayoutReference": { "predefinedLayout": layout }
            }
        }));
        requests.push(json!({
            "insertText": {
                "objectId": format!("{}_title", slide_id),
                "text": block.title
            }
        }));
        requests.push(json!({
            "insertText": {
                "objectId": format!("{}_{}", slide_id, body_suffix),
                "text": block.body
            }
        }));
    }

    requests
}

#[async_trait]
impl DeckRenderer for SlidesClient {
    async fn render(&self, title: &str, blocks: &[SlideBlock]) -> Result<RenderedDeck> {
        let (presentation_id, default_slides) = self.create_presentation(title).await?;

        let requests = build_slide_requests(&default_slides, blocks);
        self.batch_update(&presentation_id, &requests).await?;

        if let Some(folder_id) = &self.config.folder_id {
            self.move_to_folder(&presentation_id, folder_id).await;
        }
        self.share_with_anyone(&presentation_id).await;

        let slide_url = format!("https://docs.google.com/presentation/d/{}", presentation_id);

        tracing::info!(
            presentation_id,
            slides = blocks.len(),
            "Rendered slide deck"
        );

        Ok(RenderedDeck {
            presentation_id,
            slide_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> Vec<SlideBlock> {
        vec![
            SlideBlock {
                title: "Report".to_string(),
                body: "Session: retro".to_string(),
            },
            SlideBlock {
                title: "Stats".to_string(),
                body: "Total: 2".to_string(),
            },
        ]
    }

    #[test]
    fn test_renderer_requires_token() {
        std::env::remove_var("GOOGLE_ACCESS_TOKEN");
        let config = SlidesConfig::default();
        assert!(SlidesClient::new(config).is_err());
    }

    #[test]
    fn test_renderer_with_valid_config() {
        let config = SlidesConfig {
            access_token: Some("ya29.test".to_string()),
            ..Default::default()
        };
        assert!(SlidesClient::new(config).is_ok());
    }

    #[test]
    fn test_requests_delete_defaults_then_create_slides() {
        let defaults = vec!["p_default".to_string()];
        let requests = build_slide_requests(&defaults, &blocks());

        // 1 delete + 3 requests per block
        assert_eq!(requests.len(), 1 + 2 * 3);
        assert!(requests[0].get("deleteObject").is_some());

        let first_create = &requests[1]["createSlide"];
        assert_eq!(first_create["objectId"], "slide_0");
        assert_eq!(
            first_create["slideLayoutReference"]["predefinedLayout"],
            "TITLE"
        );
        // First slide body goes into the subtitle placeholder
        assert_eq!(requests[3]["insertText"]["objectId"], "slide_0_subtitle");

        let second_create = &requests[4]["createSlide"];
        assert_eq!(
            second_create["slideLayoutReference"]["predefinedLayout"],
            "TITLE_AND_BODY"
        );
        assert_eq!(requests[6]["insertText"]["objectId"], "slide_1_body");
    }
}
