//! Presentation of result slots.
//!
//! A result is shown as an inline player plus a download link carrying the
//! flow's fixed filename. `result_view` gives front ends the pieces to lay
//! out themselves; `audio_result_html` renders the markup for embedding in a
//! web page.

use crate::api::types::{AudioResult, Flow};
use crate::panel::state::PanelState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView<'a> {
    pub flow: Flow,
    /// Source of the player and target of the download link
    pub src: &'a str,
    pub download_name: &'static str,
    pub download_label: &'static str,
}

fn download_label(flow: Flow) -> &'static str {
    match flow {
        Flow::Clone => "Download cloned audio",
        Flow::Synthesis => "Download synthesized speech",
    }
}

/// `None` while the flow has no result; nothing is rendered in that case.
pub fn result_view(state: &PanelState, flow: Flow) -> Option<ResultView<'_>> {
    let result = state.flow(flow).result.as_ref()?;
    Some(ResultView {
        flow,
        src: &result.audio_url,
        download_name: flow.download_file_name(),
        download_label: download_label(flow),
    })
}

/// One-line text form of a result, for front ends without a player.
pub fn result_caption(flow: Flow, src: &str) -> String {
    match flow {
        Flow::Clone => format!("Cloned audio: {src}"),
        Flow::Synthesis => format!("Synthesized speech: {src}"),
    }
}

pub fn audio_result_html(flow: Flow, result: &AudioResult) -> String {
    let src = escape_attr(&result.audio_url);
    format!(
        concat!(
            "<div class=\"audio-result\" data-flow=\"{flow}\">\n",
            "  <audio controls>\n",
            "    <source src=\"{src}\" type=\"audio/mpeg\">\n",
            "    Your browser does not support audio playback.\n",
            "  </audio>\n",
            "  <a href=\"{src}\" download=\"{name}\">{label}</a>\n",
            "</div>\n"
        ),
        flow = flow,
        src = src,
        name = flow.download_file_name(),
        label = download_label(flow),
    )
}

/// Markup for every flow that currently has a result, clone first.
pub fn panel_results_html(state: &PanelState) -> String {
    [Flow::Clone, Flow::Synthesis]
        .into_iter()
        .filter_map(|flow| {
            let result = state.flow(flow).result.as_ref()?;
            Some(audio_result_html(flow, result))
        })
        .collect()
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
