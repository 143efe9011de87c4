use anyhow::anyhow;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a single clone or synthesis round trip. None of these are
/// retried; the panel logs them and leaves the previous result in place.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(anyhow::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Response did not contain an audio_url")]
    MissingAudioUrl,

    #[error("Failed to read audio file {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for ApiError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport(anyhow!(source))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(source: serde_json::Error) -> Self {
        Self::MalformedResponse(source.to_string())
    }
}
