use serde::{Deserialize, Serialize};
use strum::Display;

use super::factor::Factor;
use crate::api::types::{AudioFile, AudioResult, Flow};

/// Pending/result/error slot for one flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    /// True from dispatch until the response settles
    pub pending: bool,

    /// Last successful result; replaced, never appended
    pub result: Option<AudioResult>,

    /// Message of the most recent failure, cleared by the next success
    pub last_error: Option<String>,
}

/// Why a submit was dropped without sending a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    #[strum(to_string = "no audio file selected")]
    NoFileSelected,
    #[strum(to_string = "text is empty")]
    EmptyText,
    #[strum(to_string = "a request is already in flight")]
    Busy,
    #[strum(to_string = "no result to download")]
    NoResult,
}

/// Session state of the panel. Lives as long as the panel actor and is
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelState {
    pub file: Option<AudioFile>,
    pub pitch: Factor,
    pub speed: Factor,
    pub text: String,
    pub clone_flow: FlowState,
    pub synthesis_flow: FlowState,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new(Factor::default(), Factor::default())
    }
}

impl PanelState {
    pub fn new(pitch: Factor, speed: Factor) -> Self {
        Self {
            file: None,
            pitch,
            speed,
            text: String::new(),
            clone_flow: FlowState::default(),
            synthesis_flow: FlowState::default(),
        }
    }

    /// The shared loading flag, derived from both flows so one flow settling
    /// can never clear it while the other is still in flight.
    pub fn is_loading(&self) -> bool {
        self.clone_flow.pending || self.synthesis_flow.pending
    }

    pub fn flow(&self, flow: Flow) -> &FlowState {
        match flow {
            Flow::Clone => &self.clone_flow,
            Flow::Synthesis => &self.synthesis_flow,
        }
    }

    pub fn flow_mut(&mut self, flow: Flow) -> &mut FlowState {
        match flow {
            Flow::Clone => &mut self.clone_flow,
            Flow::Synthesis => &mut self.synthesis_flow,
        }
    }

    /// Checks the submit preconditions for `flow`. Submit controls are
    /// disabled while loading, so a busy panel drops the submit as well.
    pub fn check_submit(&self, flow: Flow) -> Result<(), IgnoreReason> {
        if self.is_loading() {
            return Err(IgnoreReason::Busy);
        }
        match flow {
            Flow::Clone if self.file.is_none() => Err(IgnoreReason::NoFileSelected),
            Flow::Synthesis if self.text.is_empty() => Err(IgnoreReason::EmptyText),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_empty() {
        let state = PanelState::default();
        assert!(state.file.is_none());
        assert_eq!(state.pitch.value(), 1.0);
        assert_eq!(state.speed.value(), 1.0);
        assert!(state.text.is_empty());
        assert!(!state.is_loading());
        assert!(state.clone_flow.result.is_none());
        assert!(state.synthesis_flow.result.is_none());
    }

    #[test]
    fn loading_is_or_of_flows() {
        let mut state = PanelState::default();
        state.clone_flow.pending = true;
        assert!(state.is_loading());
        state.synthesis_flow.pending = true;
        state.clone_flow.pending = false;
        assert!(state.is_loading());
        state.synthesis_flow.pending = false;
        assert!(!state.is_loading());
    }

    #[test]
    fn submit_preconditions() {
        let mut state = PanelState::default();
        assert_eq!(
            state.check_submit(Flow::Clone),
            Err(IgnoreReason::NoFileSelected)
        );
        assert_eq!(
            state.check_submit(Flow::Synthesis),
            Err(IgnoreReason::EmptyText)
        );

        state.text = " ".to_string();
        assert_eq!(state.check_submit(Flow::Synthesis), Ok(()));

        state.file = Some(AudioFile::from_path("sample.wav").unwrap());
        assert_eq!(state.check_submit(Flow::Clone), Ok(()));

        state.synthesis_flow.pending = true;
        assert_eq!(state.check_submit(Flow::Clone), Err(IgnoreReason::Busy));
    }
}
