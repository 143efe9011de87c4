use anyhow::anyhow;
use std::path::PathBuf;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{info, warn};
use vocalclone_core::{PanelActor, PanelEvent, PanelMessage};

/// Host a panel on stdin/stdout: one `PanelMessage` JSON object per input
/// line, one `PanelEvent` JSON object per output line.
pub async fn run_subprocess(
    settings_path: Option<PathBuf>,
    profile: Option<String>,
) -> anyhow::Result<()> {
    let mut builder = PanelActor::builder().profile(profile);
    if let Some(path) = settings_path {
        builder = builder.settings_path(path);
    }
    let (actor, event_rx) = builder.build()?;

    run_bridge(actor, event_rx, BufReader::new(io::stdin()), io::stdout()).await
}

/// Pump messages from `input` into the actor and its events out to `output`
/// until the input ends and the actor has drained.
pub async fn run_bridge<R, W>(
    actor: PanelActor,
    mut event_rx: mpsc::UnboundedReceiver<PanelEvent>,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut join_set: JoinSet<anyhow::Result<()>> = JoinSet::new();

    join_set.spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let json = serde_json::to_string(&event)?;
            let json = format!("{json}\n");
            output.write_all(json.as_bytes()).await?;
            output.flush().await?;
        }
        Ok(())
    });

    join_set.spawn(async move {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let message: PanelMessage = match serde_json::from_str(&line) {
                Ok(message) => message,
                Err(e) => {
                    warn!(?e, %line, "Skipping malformed input line");
                    continue;
                }
            };
            let shutdown = message == PanelMessage::Shutdown;
            actor.tx.send(message)?;
            if shutdown {
                return Ok(());
            }
        }
        info!("Input closed, shutting down panel");
        actor.shutdown()?;
        Ok(())
    });

    while let Some(result) = join_set.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(anyhow!(e)),
            Err(panic) => return Err(anyhow!(panic)),
        }
    }
    Ok(())
}
