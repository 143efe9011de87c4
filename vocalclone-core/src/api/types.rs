use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};

use super::error::ApiError;
use super::provider::AudioService;
use crate::panel::factor::Factor;

/// The two independent request flows of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Flow {
    Clone,
    Synthesis,
}

impl Flow {
    /// Fixed filename offered when the user downloads this flow's result.
    pub fn download_file_name(self) -> &'static str {
        match self {
            Flow::Clone => "cloned_audio.mp3",
            Flow::Synthesis => "synthesized_audio.mp3",
        }
    }
}

/// Returns the MIME type for paths with a known audio extension.
pub fn audio_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" | "aac" => "audio/aac",
        "webm" => "audio/webm",
        "opus" => "audio/opus",
        _ => return None,
    };
    Some(mime)
}

/// A user-selected audio sample. Only the handle is stored; the bytes are
/// read when the clone request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
}

impl AudioFile {
    /// Build a handle for `path`. Only the extension is checked, mirroring an
    /// `accept="audio/*"` picker; content, size and format are not inspected.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let Some(mime) = audio_mime(&path) else {
            bail!("{} is not an audio file", path.display());
        };
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .with_context(|| format!("Path has no file name: {path:?}"))?;

        Ok(Self {
            path,
            file_name,
            mime: mime.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloneRequest {
    pub file: AudioFile,
    pub pitch: Factor,
    pub speed: Factor,
}

/// JSON body of the text-to-speech endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
}

/// One round trip to either endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServiceRequest {
    Clone(CloneRequest),
    Synthesis(SynthesisRequest),
}

impl ServiceRequest {
    pub fn flow(&self) -> Flow {
        match self {
            ServiceRequest::Clone(_) => Flow::Clone,
            ServiceRequest::Synthesis(_) => Flow::Synthesis,
        }
    }

    pub async fn dispatch(&self, service: &dyn AudioService) -> Result<AudioResult, ApiError> {
        match self {
            ServiceRequest::Clone(request) => service.clone_audio(request).await,
            ServiceRequest::Synthesis(request) => service.text_to_speech(request).await,
        }
    }
}

/// A server-produced audio artifact. This is what a result slot holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioResult {
    pub audio_url: String,
}

impl AudioResult {
    /// Parse an endpoint response body. Non-JSON bodies are malformed; JSON
    /// without a non-empty string `audio_url` has no result.
    pub fn from_response_body(body: &[u8]) -> Result<Self, ApiError> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        match value.get("audio_url").and_then(|v| v.as_str()) {
            Some(url) if !url.is_empty() => Ok(Self {
                audio_url: url.to_string(),
            }),
            _ => Err(ApiError::MissingAudioUrl),
        }
    }
}
