use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::TextArea;
use vocalclone_core::{Flow, PanelMessage};

use super::state::{Focus, TuiState};

pub enum TuiAction {
    /// Forward a message to the panel actor.
    Send(PanelMessage),
    /// Quit the application.
    Quit,
    /// No action needed.
    None,
}

pub fn handle_key_event(key: KeyEvent, textarea: &mut TextArea, state: &mut TuiState) -> TuiAction {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), m) | (KeyCode::Char('d'), m) if m.contains(KeyModifiers::CONTROL) => {
            TuiAction::Quit
        }

        // Ctrl+S submits the text from inside the editor
        (KeyCode::Char('s'), m) if m.contains(KeyModifiers::CONTROL) => submit(state, Flow::Synthesis),

        (KeyCode::Tab, _) => {
            state.focus = state.focus.next();
            TuiAction::None
        }
        (KeyCode::BackTab, _) => {
            state.focus = state.focus.prev();
            TuiAction::None
        }

        _ if state.focus == Focus::Text => handle_text_key(key, textarea),

        (KeyCode::Char('q'), KeyModifiers::NONE) => TuiAction::Quit,

        _ => handle_control_key(key, state),
    }
}

fn handle_text_key(key: KeyEvent, textarea: &mut TextArea) -> TuiAction {
    if key.code == KeyCode::Esc {
        *textarea = TextArea::default();
        configure_textarea(textarea);
    } else if !textarea.input(key) {
        return TuiAction::None;
    }
    TuiAction::Send(PanelMessage::SetText(textarea.lines().join("\n")))
}

fn handle_control_key(key: KeyEvent, state: &mut TuiState) -> TuiAction {
    match (state.focus, key.code) {
        (Focus::Picker, KeyCode::Up) => {
            state.picker_up();
            TuiAction::None
        }
        (Focus::Picker, KeyCode::Down) => {
            state.picker_down();
            TuiAction::None
        }
        (Focus::Picker, KeyCode::Char('r')) => {
            state.refresh_picker();
            TuiAction::None
        }
        (Focus::Picker, KeyCode::Enter) => match state.highlighted_file() {
            Some(path) => TuiAction::Send(PanelMessage::SelectFile(Some(path.clone()))),
            None => TuiAction::None,
        },
        (Focus::Picker, KeyCode::Delete | KeyCode::Backspace) => {
            TuiAction::Send(PanelMessage::SelectFile(None))
        }

        (Focus::Pitch, KeyCode::Left) => {
            TuiAction::Send(PanelMessage::SetPitch(state.panel.pitch.step_down().value()))
        }
        (Focus::Pitch, KeyCode::Right) => {
            TuiAction::Send(PanelMessage::SetPitch(state.panel.pitch.step_up().value()))
        }
        (Focus::Speed, KeyCode::Left) => {
            TuiAction::Send(PanelMessage::SetSpeed(state.panel.speed.step_down().value()))
        }
        (Focus::Speed, KeyCode::Right) => {
            TuiAction::Send(PanelMessage::SetSpeed(state.panel.speed.step_up().value()))
        }

        (Focus::CloneButton, KeyCode::Enter) => submit(state, Flow::Clone),
        (Focus::SynthesisButton, KeyCode::Enter) => submit(state, Flow::Synthesis),
        (Focus::CloneButton, KeyCode::Char('d')) => {
            TuiAction::Send(PanelMessage::Download(Flow::Clone))
        }
        (Focus::SynthesisButton, KeyCode::Char('d')) => {
            TuiAction::Send(PanelMessage::Download(Flow::Synthesis))
        }

        _ => TuiAction::None,
    }
}

/// Both submit buttons are disabled while anything is loading.
fn submit(state: &TuiState, flow: Flow) -> TuiAction {
    if state.panel.is_loading() {
        return TuiAction::None;
    }
    TuiAction::Send(PanelMessage::Submit(flow))
}

pub fn configure_textarea(textarea: &mut TextArea) {
    textarea.set_placeholder_text("Enter text to synthesize... (Ctrl+S to generate)");
    textarea.set_cursor_line_style(ratatui::style::Style::default());
    textarea.set_style(ratatui::style::Style::default().fg(ratatui::style::Color::White));
}
