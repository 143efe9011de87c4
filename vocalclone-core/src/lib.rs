pub mod api;
pub mod download;
pub mod panel;
pub mod picker;
pub mod render;
pub mod settings;

// Public library API - front ends (the CLI, the subprocess bridge) should only
// need these types.
pub use api::provider::AudioService;
pub use api::types::{AudioFile, AudioResult, Flow};
pub use panel::{PanelActor, PanelEvent, PanelMessage, PanelState};
pub use settings::{Settings, SettingsManager};
