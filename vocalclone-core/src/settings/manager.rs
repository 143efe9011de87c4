use crate::settings::config::Settings;
use anyhow::{bail, Context, Result};
use std::fs;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Settings shared by everything in one process. In-memory updates (such as
/// `--base-url` on the command line) last for this process only; `save`
/// writes them back so future processes see them too.
#[derive(Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
    inner: Arc<Mutex<Settings>>,
}

impl SettingsManager {
    /// Create a settings manager at the default location, optionally for a
    /// named profile
    pub fn new(profile: Option<&str>) -> Result<Self> {
        Self::from_settings_dir(Self::default_settings_dir()?, profile)
    }

    /// Profiles live next to the default settings as `settings_<name>.toml`
    pub fn from_settings_dir(dir: PathBuf, profile: Option<&str>) -> Result<Self> {
        let file_name = match profile {
            None => "settings.toml".to_string(),
            Some(name) => {
                if name.is_empty() || name.contains(['/', '\\', '.']) {
                    bail!("Invalid profile name: {name:?}");
                }
                format!("settings_{name}.toml")
            }
        };
        Self::from_path(dir.join(file_name))
    }

    /// Create a settings manager from a specific path
    pub fn from_path(path: PathBuf) -> Result<Self> {
        // Ensure default settings file exists if it doesn't
        if !path.exists() {
            Self::write_settings(&path, &Settings::default())?;
        }

        let loaded = Self::load_from_file_with_backup(&path)?;

        Ok(Self {
            settings_path: path,
            inner: Arc::new(Mutex::new(loaded)),
        })
    }

    /// Get the default settings directory (~/.vocalclone)
    pub fn default_settings_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".vocalclone"))
    }

    fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }
        let contents =
            toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings to {path:?}"))?;
        Ok(())
    }

    /// Load settings from a TOML file with backup on parse failure
    fn load_from_file_with_backup(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {path:?}"))?;

        match toml::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!(?path, %e, "Settings file is corrupted, resetting to defaults");

                // Move corrupted file to backup
                let backup_path = path.with_extension("toml.backup");
                fs::rename(path, &backup_path).with_context(|| {
                    format!("Failed to backup corrupted settings to {backup_path:?}")
                })?;

                let default_settings = Settings::default();
                Self::write_settings(path, &default_settings)?;
                Ok(default_settings)
            }
        }
    }

    /// Get the in-memory settings
    pub fn settings(&self) -> Settings {
        self.inner.lock().unwrap().clone()
    }

    /// Update in-memory settings with a closure. Note: settings are not saved to disk
    pub fn update_setting<F>(&self, updater: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.inner.lock().unwrap();
        updater(guard.deref_mut());
    }

    /// Save provided settings
    pub fn save_settings(&self, settings: Settings) -> Result<()> {
        Self::write_settings(&self.settings_path, &settings)?;
        *self.inner.lock().unwrap() = settings;
        Ok(())
    }

    /// Explicitly persist in-memory settings to disk
    pub fn save(&self) -> Result<()> {
        self.save_settings(self.settings())
    }

    /// Get the settings file path
    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    /// Profile name inferred from a `settings_<name>.toml` file name
    pub fn current_profile(&self) -> Option<&str> {
        let stem = self.settings_path.file_stem()?.to_str()?;
        if self.settings_path.extension()?.to_str()? != "toml" {
            return None;
        }
        let name = stem.strip_prefix("settings_")?;
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}
