use std::path::PathBuf;
use vocalclone_core::picker::find_audio_files;
use vocalclone_core::PanelState;

/// Oldest activity entries are dropped beyond this many.
pub const MAX_LOG_ENTRIES: usize = 200;

/// A single line in the activity log under the panels.
#[derive(Clone, Debug, PartialEq)]
pub enum LogEntry {
    Info { content: String },
    Warning { content: String },
    Error { content: String },
}

/// Which control receives key input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Picker,
    Pitch,
    Speed,
    CloneButton,
    Text,
    SynthesisButton,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Picker,
        Focus::Pitch,
        Focus::Speed,
        Focus::CloneButton,
        Focus::Text,
        Focus::SynthesisButton,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct TuiState {
    /// Mirror of the actor's panel, kept current from `PanelEvent`s.
    pub panel: PanelState,

    pub focus: Focus,

    /// Audio files offered by the picker.
    pub picker_files: Vec<PathBuf>,
    pub picker_index: usize,
    picker_root: PathBuf,
    picker_depth: usize,

    /// Activity log, newest last.
    pub log: Vec<LogEntry>,

    /// Spinner animation frame counter.
    pub spinner_frame: usize,

    /// Server origin for the status bar.
    pub base_url: String,

    pub should_quit: bool,
}

impl TuiState {
    pub fn new(panel: PanelState, base_url: String, picker_root: PathBuf, picker_depth: usize) -> Self {
        let mut state = Self {
            panel,
            focus: Focus::Picker,
            picker_files: Vec::new(),
            picker_index: 0,
            picker_root,
            picker_depth,
            log: Vec::new(),
            spinner_frame: 0,
            base_url,
            should_quit: false,
        };
        state.refresh_picker();
        state
    }

    pub fn refresh_picker(&mut self) {
        self.picker_files = find_audio_files(&self.picker_root, self.picker_depth);
        self.picker_index = self
            .picker_index
            .min(self.picker_files.len().saturating_sub(1));
    }

    pub fn picker_root(&self) -> &PathBuf {
        &self.picker_root
    }

    pub fn highlighted_file(&self) -> Option<&PathBuf> {
        self.picker_files.get(self.picker_index)
    }

    pub fn picker_up(&mut self) {
        self.picker_index = self.picker_index.saturating_sub(1);
    }

    pub fn picker_down(&mut self) {
        if self.picker_index + 1 < self.picker_files.len() {
            self.picker_index += 1;
        }
    }

    pub fn push_log(&mut self, entry: LogEntry) {
        self.log.push(entry);
        if self.log.len() > MAX_LOG_ENTRIES {
            let excess = self.log.len() - MAX_LOG_ENTRIES;
            self.log.drain(..excess);
        }
    }
}
