//! Saving result audio to disk under the fixed per-flow filename

use anyhow::{bail, Context, Result};
use reqwest::{Client, Url};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::api::types::Flow;
use crate::settings::Settings;

#[derive(Clone)]
pub struct Downloader {
    client: Client,
    base_url: Url,
    download_dir: PathBuf,
}

impl Downloader {
    pub fn new(base_url: Url, download_dir: PathBuf) -> Self {
        Self {
            client: Client::new(),
            base_url,
            download_dir,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("Invalid base_url: {}", settings.base_url))?;
        let download_dir = match &settings.download_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to get current directory")?,
        };
        Ok(Self::new(base_url, download_dir))
    }

    /// Result URLs may be relative to the server that produced them.
    pub fn resolve(&self, audio_url: &str) -> Result<Url> {
        if let Ok(url) = Url::parse(audio_url) {
            return Ok(url);
        }
        self.base_url
            .join(audio_url)
            .with_context(|| format!("Failed to resolve {audio_url} against {}", self.base_url))
    }

    pub fn target_path(&self, flow: Flow) -> PathBuf {
        self.download_dir.join(flow.download_file_name())
    }

    /// The flow's target file, if an earlier download already wrote it.
    pub fn existing_target(&self, flow: Flow) -> Option<PathBuf> {
        let path = self.target_path(flow);
        path.is_file().then_some(path)
    }

    pub async fn download(&self, flow: Flow, audio_url: &str) -> Result<PathBuf> {
        let url = self.resolve(audio_url)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            bail!("Download of {url} failed with status {status}");
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read audio bytes")?;

        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .with_context(|| format!("Failed to create directory: {:?}", self.download_dir))?;

        let path = self.target_path(flow);
        if self.existing_target(flow).is_some() {
            warn!(?path, "Overwriting existing download");
        }
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write {path:?}"))?;

        info!(%url, ?path, size = bytes.len(), "Saved audio");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downloader() -> Downloader {
        Downloader::new(
            Url::parse("http://localhost:8000").unwrap(),
            PathBuf::from("/downloads"),
        )
    }

    #[test]
    fn resolves_relative_urls_against_base() {
        let url = downloader().resolve("/tmp/a.mp3").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/tmp/a.mp3");
    }

    #[test]
    fn keeps_absolute_urls() {
        let url = downloader().resolve("https://cdn.example.com/y.mp3").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/y.mp3");
    }

    #[test]
    fn target_uses_fixed_filename() {
        assert_eq!(
            downloader().target_path(Flow::Clone),
            PathBuf::from("/downloads/cloned_audio.mp3")
        );
        assert_eq!(
            downloader().target_path(Flow::Synthesis),
            PathBuf::from("/downloads/synthesized_audio.mp3")
        );
    }

    #[test]
    fn existing_target_reports_earlier_download() {
        let dir = tempfile::TempDir::new().unwrap();
        let downloader = Downloader::new(
            Url::parse("http://localhost:8000").unwrap(),
            dir.path().to_path_buf(),
        );
        assert_eq!(downloader.existing_target(Flow::Clone), None);

        std::fs::write(dir.path().join("cloned_audio.mp3"), b"old").unwrap();
        assert_eq!(
            downloader.existing_target(Flow::Clone),
            Some(dir.path().join("cloned_audio.mp3"))
        );
        assert_eq!(downloader.existing_target(Flow::Synthesis), None);
    }
}
