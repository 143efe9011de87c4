pub mod clone_panel;
pub mod log_panel;
pub mod status_bar;
pub mod synthesis_panel;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use vocalclone_core::render::{result_caption, result_view};
use vocalclone_core::{Flow, PanelState};

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Submit buttons read "Processing..." and are disabled while loading.
fn button_line(label: &str, loading: bool, focused: bool) -> Line<'static> {
    let (text, style) = if loading {
        ("Processing...".to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (format!("[ {label} ]"), focus_style(focused))
    };
    Line::from(Span::styled(text, style))
}

/// The result slot: nothing until the flow has a result, then its player
/// source and download filename.
fn result_lines(panel: &PanelState, flow: Flow) -> Vec<Line<'static>> {
    let Some(view) = result_view(panel, flow) else {
        return Vec::new();
    };
    vec![
        Line::styled(
            result_caption(view.flow, view.src),
            Style::default().fg(Color::Green),
        ),
        Line::styled(
            format!("{} as {} (d)", view.download_label, view.download_name),
            Style::default().fg(Color::Cyan),
        ),
    ]
}
