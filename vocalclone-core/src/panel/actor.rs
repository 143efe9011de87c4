use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::events::{EventSender, PanelEvent};
use super::factor::Factor;
use super::state::{IgnoreReason, PanelState};
use crate::api::error::ApiError;
use crate::api::http::HttpAudioService;
use crate::api::provider::AudioService;
use crate::api::types::{AudioFile, AudioResult, CloneRequest, Flow, ServiceRequest, SynthesisRequest};
use crate::download::Downloader;
use crate::settings::{Settings, SettingsManager};

/// Defines the possible input messages to the `PanelActor`.
///
/// These derive serde so the subprocess bridge can read them as JSON lines
/// from stdin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PanelMessage {
    /// Replace the selected file; `None` clears the selection
    SelectFile(Option<PathBuf>),
    SetPitch(f64),
    SetSpeed(f64),
    SetText(String),
    Submit(Flow),
    /// Save the flow's current result under its fixed download filename
    Download(Flow),
    /// Emit a `PanelEvent::State` snapshot
    GetState,
    /// Stop taking messages. In-flight requests and downloads still settle
    /// and emit their events before the actor exits.
    Shutdown,
}

/// The `PanelActor` owns the panel's session state.
///
/// Front ends hold no logic of their own: they send `PanelMessage`s on the
/// input channel and render the `PanelEvent`s that come back on the
/// receiver returned at launch. Each submit runs as its own local task that
/// reports back to the actor, so the clone and synthesis flows never wait on
/// each other.
pub struct PanelActor {
    pub tx: mpsc::UnboundedSender<PanelMessage>,
}

impl PanelActor {
    pub fn builder() -> PanelActorBuilder {
        PanelActorBuilder::default()
    }

    /// Launch the actor on the current `LocalSet` and return a handle to it
    pub fn launch(
        service: Arc<dyn AudioService>,
        downloader: Downloader,
        initial: PanelState,
    ) -> (Self, mpsc::UnboundedReceiver<PanelEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (event_sender, event_rx) = EventSender::new();

        let state = ActorState {
            event_sender,
            service,
            downloader,
            panel: initial,
            completion_tx,
            downloads_in_flight: 0,
        };

        tokio::task::spawn_local(run_actor(state, rx, completion_rx));

        (PanelActor { tx }, event_rx)
    }

    pub fn select_file(&self, path: Option<PathBuf>) -> Result<()> {
        self.tx.send(PanelMessage::SelectFile(path))?;
        Ok(())
    }

    pub fn set_pitch(&self, pitch: f64) -> Result<()> {
        self.tx.send(PanelMessage::SetPitch(pitch))?;
        Ok(())
    }

    pub fn set_speed(&self, speed: f64) -> Result<()> {
        self.tx.send(PanelMessage::SetSpeed(speed))?;
        Ok(())
    }

    pub fn set_text(&self, text: impl Into<String>) -> Result<()> {
        self.tx.send(PanelMessage::SetText(text.into()))?;
        Ok(())
    }

    pub fn submit(&self, flow: Flow) -> Result<()> {
        self.tx.send(PanelMessage::Submit(flow))?;
        Ok(())
    }

    pub fn download(&self, flow: Flow) -> Result<()> {
        self.tx.send(PanelMessage::Download(flow))?;
        Ok(())
    }

    pub fn get_state(&self) -> Result<()> {
        self.tx.send(PanelMessage::GetState)?;
        Ok(())
    }

    pub fn shutdown(&self) -> Result<()> {
        self.tx.send(PanelMessage::Shutdown)?;
        Ok(())
    }
}

/// Builds a `PanelActor`. Without an explicit service the actor talks HTTP
/// to the endpoints configured in settings.
#[derive(Default)]
pub struct PanelActorBuilder {
    settings: Option<Settings>,
    settings_path: Option<PathBuf>,
    profile: Option<String>,
    service: Option<Arc<dyn AudioService>>,
}

impl PanelActorBuilder {
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    pub fn profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    pub fn service(mut self, service: Arc<dyn AudioService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn build(self) -> Result<(PanelActor, mpsc::UnboundedReceiver<PanelEvent>)> {
        let settings = match (self.settings, self.settings_path) {
            (Some(settings), _) => settings,
            (None, Some(path)) => SettingsManager::from_path(path)?.settings(),
            (None, None) => SettingsManager::new(self.profile.as_deref())?.settings(),
        };

        let service = match self.service {
            Some(service) => service,
            None => Arc::new(
                HttpAudioService::from_settings(&settings)
                    .context("Failed to create audio service")?,
            ),
        };
        let downloader = Downloader::from_settings(&settings)?;
        let initial = PanelState::new(
            Factor::new(settings.default_pitch),
            Factor::new(settings.default_speed),
        );

        info!(service = service.name(), base_url = %settings.base_url, "Launching panel actor");
        Ok(PanelActor::launch(service, downloader, initial))
    }
}

enum Completion {
    Request {
        flow: Flow,
        outcome: Result<AudioResult, ApiError>,
    },
    Download {
        flow: Flow,
        outcome: Result<PathBuf>,
    },
}

struct ActorState {
    event_sender: EventSender,
    service: Arc<dyn AudioService>,
    downloader: Downloader,
    panel: PanelState,
    completion_tx: mpsc::UnboundedSender<Completion>,
    downloads_in_flight: usize,
}

impl ActorState {
    /// Emit `LoadingChanged` if the derived flag differs from `was_loading`
    fn sync_loading(&self, was_loading: bool) {
        let loading = self.panel.is_loading();
        if loading != was_loading {
            self.event_sender.send(PanelEvent::LoadingChanged(loading));
        }
    }

    /// Requests and downloads that have not reported back yet
    fn has_in_flight(&self) -> bool {
        self.panel.is_loading() || self.downloads_in_flight > 0
    }

    fn ignore(&self, flow: Flow, reason: IgnoreReason) {
        debug!(%flow, %reason, "Ignoring request");
        self.event_sender.send(PanelEvent::Ignored { flow, reason });
    }
}

async fn run_actor(
    mut state: ActorState,
    mut rx: mpsc::UnboundedReceiver<PanelMessage>,
    mut completion_rx: mpsc::UnboundedReceiver<Completion>,
) {
    info!("PanelActor started");

    // After Shutdown (or the input closing) no new messages are taken, but
    // work already dispatched still settles and reports its events.
    let mut closing = false;

    loop {
        if closing && !state.has_in_flight() {
            break;
        }

        tokio::select! {
            message = rx.recv(), if !closing => {
                match message {
                    None => {
                        info!("Panel input channel closed");
                        closing = true;
                    }
                    Some(PanelMessage::Shutdown) => {
                        info!("Shutdown requested");
                        closing = true;
                    }
                    Some(message) => {
                        if let Err(e) = handle_message(&mut state, message) {
                            error!(?e, "Error processing message");
                            state.event_sender.error(format!("Error: {e:#}"));
                        }
                    }
                }
            }

            // The actor keeps its own sender, so this never yields None
            Some(completion) = completion_rx.recv() => {
                handle_completion(&mut state, completion);
            }
        }
    }

    info!("PanelActor stopped");
}

fn handle_message(state: &mut ActorState, message: PanelMessage) -> Result<()> {
    match message {
        PanelMessage::SelectFile(path) => {
            let file = path.map(AudioFile::from_path).transpose()?;
            debug!(?file, "File selected");
            state.panel.file = file.clone();
            state.event_sender.send(PanelEvent::FileSelected(file));
        }
        PanelMessage::SetPitch(pitch) => {
            state.panel.pitch = Factor::new(pitch);
            send_factors(state);
        }
        PanelMessage::SetSpeed(speed) => {
            state.panel.speed = Factor::new(speed);
            send_factors(state);
        }
        PanelMessage::SetText(text) => {
            state.panel.text = text.clone();
            state.event_sender.send(PanelEvent::TextChanged(text));
        }
        PanelMessage::Submit(flow) => handle_submit(state, flow),
        PanelMessage::Download(flow) => handle_download(state, flow),
        PanelMessage::GetState => {
            state
                .event_sender
                .send(PanelEvent::State(state.panel.clone()));
        }
        PanelMessage::Shutdown => {}
    }
    Ok(())
}

fn send_factors(state: &ActorState) {
    state.event_sender.send(PanelEvent::FactorsChanged {
        pitch: state.panel.pitch,
        speed: state.panel.speed,
    });
}

fn build_request(panel: &PanelState, flow: Flow) -> Result<ServiceRequest, IgnoreReason> {
    panel.check_submit(flow)?;
    match flow {
        Flow::Clone => {
            let file = panel.file.clone().ok_or(IgnoreReason::NoFileSelected)?;
            Ok(ServiceRequest::Clone(CloneRequest {
                file,
                pitch: panel.pitch,
                speed: panel.speed,
            }))
        }
        Flow::Synthesis => Ok(ServiceRequest::Synthesis(SynthesisRequest {
            text: panel.text.clone(),
        })),
    }
}

fn handle_submit(state: &mut ActorState, flow: Flow) {
    let request = match build_request(&state.panel, flow) {
        Ok(request) => request,
        Err(reason) => return state.ignore(flow, reason),
    };

    let was_loading = state.panel.is_loading();
    state.panel.flow_mut(flow).pending = true;
    state.event_sender.send(PanelEvent::RequestStarted(flow));
    state.sync_loading(was_loading);

    info!(%flow, service = state.service.name(), "Dispatching request");

    let service = state.service.clone();
    let completion_tx = state.completion_tx.clone();
    tokio::task::spawn_local(async move {
        let outcome = request.dispatch(service.as_ref()).await;
        let _ = completion_tx.send(Completion::Request { flow, outcome });
    });
}

fn handle_download(state: &mut ActorState, flow: Flow) {
    let Some(result) = state.panel.flow(flow).result.clone() else {
        return state.ignore(flow, IgnoreReason::NoResult);
    };

    state.downloads_in_flight += 1;
    let downloader = state.downloader.clone();
    let completion_tx = state.completion_tx.clone();
    tokio::task::spawn_local(async move {
        let outcome = downloader.download(flow, &result.audio_url).await;
        let _ = completion_tx.send(Completion::Download { flow, outcome });
    });
}

fn handle_completion(state: &mut ActorState, completion: Completion) {
    match completion {
        Completion::Request { flow, outcome } => {
            let was_loading = state.panel.is_loading();
            let slot = state.panel.flow_mut(flow);
            slot.pending = false;

            match outcome {
                Ok(result) => {
                    info!(%flow, audio_url = %result.audio_url, "Request succeeded");
                    slot.result = Some(result.clone());
                    slot.last_error = None;
                    state
                        .event_sender
                        .send(PanelEvent::ResultReady { flow, result });
                }
                Err(e) => {
                    // The previous result stays in its slot.
                    error!(%flow, error = %e, "Request failed");
                    slot.last_error = Some(e.to_string());
                    state.event_sender.send(PanelEvent::RequestFailed {
                        flow,
                        error: e.to_string(),
                    });
                }
            }

            state.sync_loading(was_loading);
        }
        Completion::Download { flow, outcome } => {
            state.downloads_in_flight = state.downloads_in_flight.saturating_sub(1);
            match outcome {
                Ok(path) => {
                    info!(%flow, ?path, "Result downloaded");
                    state.event_sender.send(PanelEvent::Downloaded { flow, path });
                }
                Err(e) => {
                    error!(%flow, ?e, "Download failed");
                    state
                        .event_sender
                        .error(format!("Failed to download {flow} result: {e:#}"));
                }
            }
        }
    }
}
