pub mod config;
pub mod manager;

#[cfg(test)]
mod tests;

pub use config::{PickerSettings, Settings};
pub use manager::SettingsManager;
