//! Audio file discovery for file pickers. Only files with an audio extension
//! are offered, which is the whole of the "accept audio" restriction.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::api::types::audio_mime;

/// Lists audio files under `root`, at most `max_depth` directories deep,
/// sorted by path. Gitignored and hidden entries are skipped.
pub fn find_audio_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for result in WalkBuilder::new(root).max_depth(Some(max_depth)).build() {
        let entry = match result {
            Ok(e) => e,
            Err(e) => {
                warn!(?e, "Failed to read directory entry while listing audio files");
                continue;
            }
        };

        let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
        if is_file && audio_mime(entry.path()).is_some() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    files
}
