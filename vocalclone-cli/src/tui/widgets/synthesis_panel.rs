use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;
use vocalclone_core::Flow;

use super::{button_line, focus_style, result_lines};
use crate::tui::state::{Focus, TuiState};

pub fn render(frame: &mut Frame, area: Rect, state: &TuiState, textarea: &TextArea) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Text to Speech ")
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Text
            Constraint::Length(1), // Button
            Constraint::Length(2), // Result
        ])
        .split(inner);

    let editor = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(focus_style(state.focus == Focus::Text));
    let editor_inner = editor.inner(chunks[0]);
    frame.render_widget(editor, chunks[0]);
    frame.render_widget(textarea, editor_inner);

    frame.render_widget(
        Paragraph::new(button_line(
            "Generate Speech",
            state.panel.is_loading(),
            state.focus == Focus::SynthesisButton,
        )),
        chunks[1],
    );
    frame.render_widget(
        Paragraph::new(result_lines(&state.panel, Flow::Synthesis)),
        chunks[2],
    );
}
