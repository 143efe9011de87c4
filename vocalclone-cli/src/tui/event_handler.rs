use vocalclone_core::render::result_caption;
use vocalclone_core::PanelEvent;

use super::state::{LogEntry, TuiState};

pub fn handle_panel_event(state: &mut TuiState, event: PanelEvent) {
    match event {
        PanelEvent::FileSelected(file) => {
            if let Some(ref file) = file {
                state.push_log(LogEntry::Info {
                    content: format!("Selected {}", file.path.display()),
                });
            }
            state.panel.file = file;
        }

        PanelEvent::FactorsChanged { pitch, speed } => {
            state.panel.pitch = pitch;
            state.panel.speed = speed;
        }

        PanelEvent::TextChanged(text) => {
            state.panel.text = text;
        }

        PanelEvent::RequestStarted(flow) => {
            state.panel.flow_mut(flow).pending = true;
        }

        // Loading is derived from the per-flow pending flags
        PanelEvent::LoadingChanged(_) => {}

        PanelEvent::ResultReady { flow, result } => {
            state.push_log(LogEntry::Info {
                content: result_caption(flow, &result.audio_url),
            });
            let slot = state.panel.flow_mut(flow);
            slot.pending = false;
            slot.last_error = None;
            slot.result = Some(result);
        }

        PanelEvent::RequestFailed { flow, error } => {
            state.push_log(LogEntry::Error {
                content: format!("{flow} request failed: {error}"),
            });
            let slot = state.panel.flow_mut(flow);
            slot.pending = false;
            slot.last_error = Some(error);
        }

        PanelEvent::Ignored { flow, reason } => {
            state.push_log(LogEntry::Warning {
                content: format!("{flow}: {reason}"),
            });
        }

        PanelEvent::Downloaded { path, .. } => {
            state.push_log(LogEntry::Info {
                content: format!("Saved {}", path.display()),
            });
        }

        PanelEvent::State(panel) => {
            state.panel = panel;
        }

        PanelEvent::Error(content) => {
            state.push_log(LogEntry::Error { content });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use vocalclone_core::{AudioResult, Flow, PanelState};

    fn state() -> TuiState {
        TuiState::new(
            PanelState::default(),
            "http://localhost:8000".to_string(),
            PathBuf::from("/nonexistent-picker-root"),
            1,
        )
    }

    #[test]
    fn failure_keeps_previous_result() {
        let mut state = state();
        let result = AudioResult {
            audio_url: "/tmp/a.mp3".to_string(),
        };

        handle_panel_event(&mut state, PanelEvent::RequestStarted(Flow::Clone));
        assert!(state.panel.is_loading());
        handle_panel_event(
            &mut state,
            PanelEvent::ResultReady {
                flow: Flow::Clone,
                result: result.clone(),
            },
        );
        assert!(!state.panel.is_loading());

        handle_panel_event(&mut state, PanelEvent::RequestStarted(Flow::Clone));
        handle_panel_event(
            &mut state,
            PanelEvent::RequestFailed {
                flow: Flow::Clone,
                error: "boom".to_string(),
            },
        );

        assert!(!state.panel.is_loading());
        assert_eq!(state.panel.clone_flow.result, Some(result));
        assert_eq!(state.panel.clone_flow.last_error.as_deref(), Some("boom"));
        assert!(matches!(state.log.last(), Some(LogEntry::Error { .. })));
    }
}
