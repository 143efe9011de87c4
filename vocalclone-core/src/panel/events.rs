use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::mpsc;

use super::factor::Factor;
use super::state::{IgnoreReason, PanelState};
use crate::api::types::{AudioFile, AudioResult, Flow};

/// `PanelEvent`s are the output of the panel actor.
///
/// Front ends (the TUI, the one-shot commands, the subprocess bridge) mirror
/// the panel from these events. They serialize so the subprocess bridge can
/// forward them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum PanelEvent {
    FileSelected(Option<AudioFile>),
    FactorsChanged {
        pitch: Factor,
        speed: Factor,
    },
    TextChanged(String),
    RequestStarted(Flow),
    /// Emitted only when the derived loading flag flips
    LoadingChanged(bool),
    ResultReady {
        flow: Flow,
        result: AudioResult,
    },
    RequestFailed {
        flow: Flow,
        error: String,
    },
    Ignored {
        flow: Flow,
        reason: IgnoreReason,
    },
    Downloaded {
        flow: Flow,
        path: PathBuf,
    },
    State(PanelState),
    Error(String),
}

#[derive(Clone)]
pub struct EventSender {
    event_tx: mpsc::UnboundedSender<PanelEvent>,
}

impl EventSender {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PanelEvent>) {
        let (event_tx, rx) = mpsc::unbounded_channel();
        (Self { event_tx }, rx)
    }

    /// A dropped receiver only means no front end is listening any more.
    pub fn send(&self, event: PanelEvent) {
        let _ = self.event_tx.send(event);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(PanelEvent::Error(message.into()));
    }
}
