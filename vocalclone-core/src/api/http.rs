//! reqwest implementation of the clone and text-to-speech endpoints

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tracing::{debug, warn};

use super::error::ApiError;
use super::provider::AudioService;
use super::types::{AudioResult, CloneRequest, SynthesisRequest};
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct HttpServiceConfig {
    pub base_url: Url,
    pub clone_endpoint: String,
    pub tts_endpoint: String,
    pub timeout: Option<Duration>,
}

impl HttpServiceConfig {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("Invalid base_url: {}", settings.base_url))?;
        Ok(Self {
            base_url,
            clone_endpoint: settings.clone_endpoint.clone(),
            tts_endpoint: settings.tts_endpoint.clone(),
            timeout: settings.request_timeout_secs.map(Duration::from_secs),
        })
    }

    /// Append an endpoint path to the base URL, keeping any path prefix the
    /// base URL carries.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        let joined = format!("{base}/{endpoint}");
        Url::parse(&joined).with_context(|| format!("Invalid endpoint URL: {joined}"))
    }
}

pub struct HttpAudioService {
    config: HttpServiceConfig,
    client: Client,
}

impl HttpAudioService {
    pub fn new(config: HttpServiceConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self { config, client })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(HttpServiceConfig::from_settings(settings)?)
    }

    pub fn config(&self) -> &HttpServiceConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.config.endpoint_url(endpoint).map_err(ApiError::Transport)
    }
}

/// The body decides the outcome: a usable `audio_url` is a result whatever
/// the status. A non-2xx response without one fails with its status.
async fn read_audio_response(response: Response) -> Result<AudioResult, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;

    match AudioResult::from_response_body(&body) {
        Ok(result) => {
            if !status.is_success() {
                warn!(
                    %status,
                    audio_url = %result.audio_url,
                    "Accepting result from non-success response"
                );
            }
            Ok(result)
        }
        Err(_) if !status.is_success() => Err(ApiError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        }),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl AudioService for HttpAudioService {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn clone_audio(&self, request: &CloneRequest) -> Result<AudioResult, ApiError> {
        let url = self.url(&self.config.clone_endpoint)?;

        let bytes = tokio::fs::read(&request.file.path)
            .await
            .map_err(|source| ApiError::File {
                path: request.file.path.clone(),
                source,
            })?;

        debug!(
            %url,
            file = %request.file.file_name,
            size = bytes.len(),
            pitch = %request.pitch,
            speed = %request.speed,
            "Sending clone request"
        );

        let part = Part::bytes(bytes)
            .file_name(request.file.file_name.clone())
            .mime_str(&request.file.mime)?;
        let form = Form::new()
            .part("file", part)
            .text("pitch", request.pitch.to_string())
            .text("speed", request.speed.to_string());

        let response = self.client.post(url).multipart(form).send().await?;
        read_audio_response(response).await
    }

    async fn text_to_speech(&self, request: &SynthesisRequest) -> Result<AudioResult, ApiError> {
        let url = self.url(&self.config.tts_endpoint)?;

        debug!(%url, chars = request.text.chars().count(), "Sending synthesis request");

        let response = self.client.post(url).json(request).send().await?;
        read_audio_response(response).await
    }
}
