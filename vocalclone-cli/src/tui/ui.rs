use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use tui_textarea::TextArea;

use super::state::TuiState;
use super::widgets::{clone_panel, log_panel, status_bar, synthesis_panel};

pub fn draw_ui(frame: &mut Frame, state: &TuiState, textarea: &TextArea) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(14),   // Panels
            Constraint::Length(6), // Activity log
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    clone_panel::render(frame, panels[0], state);
    synthesis_panel::render(frame, panels[1], state, textarea);
    log_panel::render(frame, rows[1], state);
    status_bar::render(frame, rows[2], state);
}
