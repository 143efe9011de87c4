use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, List, ListItem, ListState, Paragraph},
    Frame,
};
use vocalclone_core::panel::Factor;
use vocalclone_core::Flow;

use super::{button_line, focus_style, result_lines};
use crate::tui::state::{Focus, TuiState};

pub fn render(frame: &mut Frame, area: Rect, state: &TuiState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Voice Clone ")
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Picker
            Constraint::Length(1), // Selected file
            Constraint::Length(1), // Pitch
            Constraint::Length(1), // Speed
            Constraint::Length(1), // Button
            Constraint::Length(2), // Result
        ])
        .split(inner);

    render_picker(frame, chunks[0], state);

    let selected = match &state.panel.file {
        Some(file) => Line::from(vec![
            Span::styled("File: ", Style::default().fg(Color::DarkGray)),
            Span::raw(file.file_name.clone()),
        ]),
        None => Line::styled("No file selected", Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(Paragraph::new(selected), chunks[1]);

    render_factor(frame, chunks[2], "Pitch", state.panel.pitch, state.focus == Focus::Pitch);
    render_factor(frame, chunks[3], "Speed", state.panel.speed, state.focus == Focus::Speed);

    frame.render_widget(
        Paragraph::new(button_line(
            "Upload & Clone",
            state.panel.is_loading(),
            state.focus == Focus::CloneButton,
        )),
        chunks[4],
    );
    frame.render_widget(Paragraph::new(result_lines(&state.panel, Flow::Clone)), chunks[5]);
}

fn render_picker(frame: &mut Frame, area: Rect, state: &TuiState) {
    let title = format!(" Audio files in {} ", state.picker_root().display());
    let block = Block::default()
        .borders(Borders::TOP)
        .title(title)
        .border_style(focus_style(state.focus == Focus::Picker));

    if state.picker_files.is_empty() {
        let empty = Paragraph::new("No audio files found (r to rescan)")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .picker_files
        .iter()
        .map(|path| {
            let shown = path
                .strip_prefix(state.picker_root())
                .unwrap_or(path)
                .display()
                .to_string();
            ListItem::new(shown)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.picker_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_factor(frame: &mut Frame, area: Rect, label: &str, factor: Factor, focused: bool) {
    let gauge = LineGauge::default()
        .label(Span::styled(format!("{label}: {factor}"), focus_style(focused)))
        .filled_style(Style::default().fg(Color::Cyan))
        .unfilled_style(Style::default().fg(Color::DarkGray))
        .ratio(factor.ratio());
    frame.render_widget(gauge, area);
}
