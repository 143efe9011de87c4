use anyhow::Result;
use crossterm::{
    event::{Event as CrosstermEvent, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;
use tui_textarea::TextArea;
use vocalclone_core::panel::{PanelActor, PanelEvent};
use vocalclone_core::{PanelState, SettingsManager};

use super::event_handler::handle_panel_event;
use super::input_handler::{configure_textarea, handle_key_event, TuiAction};
use super::state::TuiState;
use super::ui::draw_ui;

pub struct TuiApp {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    actor: PanelActor,
    event_rx: mpsc::UnboundedReceiver<PanelEvent>,
    state: TuiState,
}

impl TuiApp {
    pub fn new(settings_manager: &SettingsManager) -> Result<Self> {
        let settings = settings_manager.settings();

        let picker_root = match &settings.picker.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        let state = TuiState::new(
            PanelState::default(),
            settings.base_url.clone(),
            picker_root,
            settings.picker.max_depth,
        );

        let (actor, event_rx) = PanelActor::builder().settings(settings).build()?;

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            actor,
            event_rx,
            state,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Install panic hook to restore terminal on panic
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        // Start from the actor's view of the panel (configured default factors)
        self.actor.get_state()?;

        let mut textarea = TextArea::default();
        configure_textarea(&mut textarea);

        let tick_rate = Duration::from_millis(80);
        let mut crossterm_reader = EventStream::new();

        loop {
            let state = &self.state;
            let ta = &textarea;
            self.terminal.draw(|frame| {
                draw_ui(frame, state, ta);
            })?;

            if self.state.should_quit {
                break;
            }

            tokio::select! {
                Some(panel_event) = self.event_rx.recv() => {
                    handle_panel_event(&mut self.state, panel_event);
                }

                Some(Ok(crossterm_event)) = crossterm_reader.next() => {
                    if let CrosstermEvent::Key(key) = crossterm_event {
                        match handle_key_event(key, &mut textarea, &mut self.state) {
                            TuiAction::Send(message) => {
                                self.actor.tx.send(message)?;
                            }
                            TuiAction::Quit => {
                                self.state.should_quit = true;
                            }
                            TuiAction::None => {}
                        }
                    }
                    // Resize re-renders on the next iteration
                }

                // Tick for spinner animation
                _ = tokio::time::sleep(tick_rate) => {
                    if self.state.panel.is_loading() {
                        self.state.spinner_frame += 1;
                    }
                }
            }
        }

        info!("Shutting down panel");
        self.actor.shutdown()?;
        self.restore_terminal()?;

        Ok(())
    }

    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
