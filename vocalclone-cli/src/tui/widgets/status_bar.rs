use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::state::TuiState;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn render(frame: &mut Frame, area: Rect, state: &TuiState) {
    let status = if state.panel.is_loading() {
        let spinner = SPINNER_CHARS[state.spinner_frame % SPINNER_CHARS.len()];
        format!("{spinner} Processing...")
    } else {
        "Ready".to_string()
    };

    let sep = Span::styled(" | ", Style::default().fg(Color::DarkGray));

    let parts: Vec<Span<'static>> = vec![
        Span::styled(" vocalclone", Style::default().fg(Color::Yellow)),
        sep.clone(),
        Span::styled(state.base_url.clone(), Style::default().fg(Color::Cyan)),
        sep.clone(),
        Span::styled(
            "Tab focus · ←/→ adjust · Enter select · d download · Ctrl+C quit",
            Style::default().fg(Color::DarkGray),
        ),
        sep,
        Span::styled(status, Style::default().fg(Color::Green)),
    ];

    let bar = Paragraph::new(Line::from(parts)).style(Style::default().bg(Color::Rgb(30, 30, 30)));

    frame.render_widget(bar, area);
}
