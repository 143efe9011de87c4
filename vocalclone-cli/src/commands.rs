//! One-shot `clone` and `tts` commands.
//!
//! Each command drives a `PanelActor` through a single submit, waits for the
//! flow to settle and prints the result the same way the panel shows it.

use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use vocalclone_core::api::Flow;
use vocalclone_core::panel::{PanelActor, PanelEvent};
use vocalclone_core::render::audio_result_html;
use vocalclone_core::Settings;

#[derive(Parser, Debug)]
pub struct CloneArgs {
    /// Audio sample to upload
    #[arg(short, long)]
    pub file: PathBuf,

    /// Pitch factor, 0.5 to 2.0 (defaults to the configured pitch)
    #[arg(short, long)]
    pub pitch: Option<f64>,

    /// Speed factor, 0.5 to 2.0 (defaults to the configured speed)
    #[arg(short, long)]
    pub speed: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct TtsArgs {
    /// Text to synthesize, sent exactly as given
    #[arg(short, long)]
    pub text: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    /// Save the result into the download directory
    #[arg(short, long)]
    pub download: bool,

    /// Print the player and download link markup instead of the plain URL
    #[arg(long, conflicts_with = "json")]
    pub html: bool,

    /// Print the service response as JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress the progress spinner
    #[arg(short, long)]
    pub quiet: bool,
}

pub async fn run_clone(settings: Settings, args: CloneArgs) -> Result<()> {
    let (actor, mut event_rx) = PanelActor::builder().settings(settings).build()?;

    actor.select_file(Some(args.file))?;
    if let Some(pitch) = args.pitch {
        actor.set_pitch(pitch)?;
    }
    if let Some(speed) = args.speed {
        actor.set_speed(speed)?;
    }
    actor.submit(Flow::Clone)?;

    let result = settle(&actor, &mut event_rx, Flow::Clone, &args.output).await;
    actor.shutdown()?;
    result
}

pub async fn run_tts(settings: Settings, args: TtsArgs) -> Result<()> {
    let (actor, mut event_rx) = PanelActor::builder().settings(settings).build()?;

    actor.set_text(args.text)?;
    actor.submit(Flow::Synthesis)?;

    let result = settle(&actor, &mut event_rx, Flow::Synthesis, &args.output).await;
    actor.shutdown()?;
    result
}

fn spinner(quiet: bool, message: &'static str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} [{elapsed}] {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn settle(
    actor: &PanelActor,
    event_rx: &mut UnboundedReceiver<PanelEvent>,
    flow: Flow,
    output: &OutputArgs,
) -> Result<()> {
    let pb = spinner(output.quiet, "Processing...");

    let result = loop {
        let Some(event) = event_rx.recv().await else {
            pb.finish_and_clear();
            bail!("Panel stopped before the {flow} request settled");
        };
        match event {
            PanelEvent::ResultReady { flow: done, result } if done == flow => break result,
            PanelEvent::RequestFailed { flow: done, error } if done == flow => {
                pb.finish_and_clear();
                bail!("{flow} request failed: {error}");
            }
            PanelEvent::Ignored { reason, .. } => {
                pb.finish_and_clear();
                bail!("{reason}");
            }
            PanelEvent::Error(e) => {
                pb.finish_and_clear();
                bail!("{e}");
            }
            other => info!(?other, "Panel event"),
        }
    };
    pb.finish_and_clear();

    if output.html {
        print!("{}", audio_result_html(flow, &result));
    } else if output.json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{}", result.audio_url);
    }

    if output.download {
        actor.download(flow)?;
        let pb = spinner(output.quiet, "Downloading...");
        loop {
            match event_rx.recv().await {
                Some(PanelEvent::Downloaded { path, .. }) => {
                    pb.finish_and_clear();
                    println!("Saved {}", path.display());
                    break;
                }
                Some(PanelEvent::Error(e)) => {
                    pb.finish_and_clear();
                    bail!("{e}");
                }
                Some(PanelEvent::Ignored { reason, .. }) => {
                    pb.finish_and_clear();
                    warn!(%reason, "Download ignored");
                    bail!("{reason}");
                }
                Some(_) => {}
                None => {
                    pb.finish_and_clear();
                    bail!("Panel stopped before the download finished");
                }
            }
        }
    }

    Ok(())
}
