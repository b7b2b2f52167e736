//! Ideogram text-to-image API client.

use std::time::Duration;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::constants::API_KEY_HEADER;
use crate::error::ThumbnailError;

/// How hard Ideogram works on an image; faster is cheaper.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderingSpeed {
    /// Fastest tier
    #[default]
    Turbo,
    /// Balanced tier
    Default,
    /// Slowest, highest fidelity tier
    Quality,
}

/// Request body for POST /v1/ideogram-v3/generate
#[derive(Clone, Debug, Serialize)]
pub struct GenerationRequest {
    /// What to draw
    pub prompt: String,
    /// What to avoid drawing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Rendering tier
    pub rendering_speed: RenderingSpeed,
    /// Aspect ratio as `WxH`, eg `16x9`
    pub aspect_ratio: String,
    /// Quality tier, eg `standard`
    pub quality: String,
}

#[derive(Deserialize, Debug)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize, Debug)]
struct GeneratedImage {
    url: Option<String>,
    #[serde(default)]
    resolution: Option<String>,
    #[serde(default)]
    is_image_safe: Option<bool>,
}

/// Something that can turn a [`GenerationRequest`] into a downloadable image URL.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Submits the request and returns the URL of the first image.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ThumbnailError>;
}

/// Talks to the real Ideogram endpoint.
#[derive(Clone, Debug)]
pub struct IdeogramClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl IdeogramClient {
    /// Builds a client with a bounded request timeout.
    pub fn new(endpoint: Url, api_key: &str, timeout: Duration) -> Result<Self, ThumbnailError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                ThumbnailError::Configuration(format!("Failed to build HTTP client: {err}"))
            })?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
        })
    }
}

/// Pulls the first image URL out of a 200 response body.
fn first_image_url(body: &[u8]) -> Result<String, ThumbnailError> {
    let parsed: GenerationResponse = serde_json::from_slice(body).map_err(|err| {
        warn!("Failed to parse generation response: {err}");
        ThumbnailError::EmptyResult
    })?;
    let first = parsed
        .data
        .into_iter()
        .next()
        .ok_or(ThumbnailError::EmptyResult)?;
    if first.is_image_safe == Some(false) {
        warn!("Ideogram flagged the generated image as unsafe");
    }
    if let Some(resolution) = &first.resolution {
        debug!("Generated image resolution: {resolution}");
    }
    first
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or(ThumbnailError::EmptyResult)
}

#[async_trait]
impl ImageGenerator for IdeogramClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ThumbnailError> {
        info!("Sending request to Ideogram API...");
        let resp = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| ThumbnailError::Request(err.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| ThumbnailError::Request(format!("Failed reading body: {err}")))?;

        if status != reqwest::StatusCode::OK {
            let body = String::from_utf8_lossy(&bytes).to_string();
            warn!("API Error: {status}, response: {body}");
            return Err(ThumbnailError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let url = first_image_url(&bytes)?;
        info!("Thumbnail generated successfully!");
        Ok(url)
    }
}
