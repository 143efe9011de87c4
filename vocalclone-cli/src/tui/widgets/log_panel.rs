use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::state::{LogEntry, TuiState};

pub fn render(frame: &mut Frame, area: Rect, state: &TuiState) {
    let block = Block::default()
        .borders(Borders::TOP)
        .title(" Activity ")
        .border_style(Style::default().fg(Color::DarkGray));
    let visible = block.inner(area).height as usize;

    // Newest entries at the bottom
    let start = state.log.len().saturating_sub(visible);
    let lines: Vec<Line> = state.log[start..]
        .iter()
        .map(|entry| match entry {
            LogEntry::Info { content } => Line::raw(content.clone()),
            LogEntry::Warning { content } => {
                Line::styled(content.clone(), Style::default().fg(Color::Yellow))
            }
            LogEntry::Error { content } => {
                Line::styled(content.clone(), Style::default().fg(Color::Red))
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
