use std::env;
use std::path::PathBuf;
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;
use vocalclone_subprocess::run_subprocess;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // stdout carries the event stream, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut settings_path: Option<PathBuf> = None;
    let mut profile: Option<String> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--settings-path" => {
                i += 1;
                if i < args.len() {
                    settings_path = Some(PathBuf::from(&args[i]));
                }
            }
            "--profile" => {
                i += 1;
                if i < args.len() {
                    profile = Some(args[i].clone());
                }
            }
            _ => {}
        }
        i += 1;
    }

    let local = LocalSet::new();
    local
        .run_until(run_subprocess(settings_path, profile))
        .await?;
    Ok(())
}
