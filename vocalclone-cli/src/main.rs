use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use vocalclone_core::SettingsManager;

mod commands;
mod tui;

use crate::commands::{CloneArgs, TtsArgs};
use crate::tui::TuiApp;

#[derive(Parser, Debug)]
#[command(name = "vocalclone")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "VocalClone - clone a voice sample or synthesize speech from text")]
struct Args {
    /// Load settings from a specific profile
    #[arg(long, value_name = "NAME", global = true)]
    profile: Option<String>,

    /// Server origin for this run, overriding settings
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload an audio sample and clone it with pitch/speed adjustments
    Clone(CloneArgs),

    /// Synthesize speech from text
    Tts(TtsArgs),
}

fn main() -> Result<()> {
    setup_tracing()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let local = tokio::task::LocalSet::new();
        local.run_until(async_main()).await
    })
}

async fn async_main() -> Result<()> {
    let args = Args::parse();

    info!(
        "CLI startup: profile={:?}, base_url={:?}, command={:?}",
        args.profile, args.base_url, args.command
    );

    let settings_manager = SettingsManager::new(args.profile.as_deref())?;
    if let Some(base_url) = args.base_url {
        settings_manager.update_setting(|s| s.base_url = base_url);
    }

    match args.command {
        Some(Command::Clone(clone_args)) => {
            commands::run_clone(settings_manager.settings(), clone_args).await
        }
        Some(Command::Tts(tts_args)) => {
            commands::run_tts(settings_manager.settings(), tts_args).await
        }
        None => {
            let mut tui_app = TuiApp::new(&settings_manager)?;
            tui_app.run().await
        }
    }
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    // The TUI owns the terminal, so logs go to a file in the user's home
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    let trace_dir = PathBuf::from(home).join(".vocalclone").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("vocalclone.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}
