use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_clone_endpoint() -> String {
    "/api/clone-audio".to_string()
}

fn default_tts_endpoint() -> String {
    "/api/text-to-speech".to_string()
}

fn default_factor() -> f64 {
    1.0
}

fn default_max_depth() -> usize {
    3
}

/// Where the TUI file picker looks for audio samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickerSettings {
    /// Directory to search; the current directory when unset
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// How many directory levels below the root to search
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            root: None,
            max_depth: default_max_depth(),
        }
    }
}

/// Core application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Origin of the cloning/synthesis server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the multipart clone endpoint, relative to `base_url`
    #[serde(default = "default_clone_endpoint")]
    pub clone_endpoint: String,

    /// Path of the JSON text-to-speech endpoint, relative to `base_url`
    #[serde(default = "default_tts_endpoint")]
    pub tts_endpoint: String,

    /// Directory downloads are written to; the current directory when unset
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    /// Requests wait indefinitely unless this is set
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Pitch factor a new panel starts with
    #[serde(default = "default_factor")]
    pub default_pitch: f64,

    /// Speed factor a new panel starts with
    #[serde(default = "default_factor")]
    pub default_speed: f64,

    #[serde(default)]
    pub picker: PickerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            clone_endpoint: default_clone_endpoint(),
            tts_endpoint: default_tts_endpoint(),
            download_dir: None,
            request_timeout_secs: None,
            default_pitch: default_factor(),
            default_speed: default_factor(),
            picker: PickerSettings::default(),
        }
    }
}
