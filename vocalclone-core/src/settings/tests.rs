use crate::settings::manager::SettingsManager;
use crate::settings::Settings;
use tempfile::TempDir;

#[test]
fn test_creates_default_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("nested").join("settings.toml");

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    assert!(settings_path.exists());
    assert_eq!(manager.settings(), Settings::default());
    assert_eq!(manager.settings().base_url, "http://localhost:8000");
    assert_eq!(manager.settings().clone_endpoint, "/api/clone-audio");
    assert_eq!(manager.settings().tts_endpoint, "/api/text-to-speech");
    assert_eq!(manager.settings().request_timeout_secs, None);
}

#[test]
fn test_partial_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    std::fs::write(
        &settings_path,
        "base_url = \"https://voice.example.com\"\n\n[picker]\nmax_depth = 1\n",
    )
    .unwrap();

    let settings = SettingsManager::from_path(settings_path).unwrap().settings();

    assert_eq!(settings.base_url, "https://voice.example.com");
    assert_eq!(settings.tts_endpoint, "/api/text-to-speech");
    assert_eq!(settings.default_pitch, 1.0);
    assert_eq!(settings.picker.max_depth, 1);
    assert_eq!(settings.picker.root, None);
}

#[test]
fn test_corrupted_settings_are_backed_up() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    std::fs::write(&settings_path, "base_url = [not toml").unwrap();

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    assert_eq!(manager.settings(), Settings::default());
    let backup = temp_dir.path().join("settings.toml.backup");
    assert_eq!(
        std::fs::read_to_string(backup).unwrap(),
        "base_url = [not toml"
    );
    let rewritten = std::fs::read_to_string(&settings_path).unwrap();
    assert!(toml::from_str::<Settings>(&rewritten).is_ok());
}

#[test]
fn test_update_is_in_memory_until_saved() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    manager.update_setting(|s| s.base_url = "http://10.0.0.2:9000".to_string());
    assert_eq!(manager.settings().base_url, "http://10.0.0.2:9000");

    let reloaded = SettingsManager::from_path(settings_path.clone()).unwrap();
    assert_eq!(reloaded.settings().base_url, "http://localhost:8000");

    manager.save().unwrap();
    let reloaded = SettingsManager::from_path(settings_path).unwrap();
    assert_eq!(reloaded.settings().base_url, "http://10.0.0.2:9000");
}

#[test]
fn test_profile_settings_path() {
    let temp_dir = TempDir::new().unwrap();

    let manager =
        SettingsManager::from_settings_dir(temp_dir.path().to_path_buf(), Some("studio")).unwrap();

    assert_eq!(manager.path(), temp_dir.path().join("settings_studio.toml"));
    assert_eq!(manager.current_profile(), Some("studio"));
    assert!(manager.path().exists());
}

#[test]
fn test_default_profile() {
    let temp_dir = TempDir::new().unwrap();

    let manager = SettingsManager::from_settings_dir(temp_dir.path().to_path_buf(), None).unwrap();

    assert_eq!(manager.path(), temp_dir.path().join("settings.toml"));
    assert_eq!(manager.current_profile(), None);
}

#[test]
fn test_invalid_profile_names() {
    let temp_dir = TempDir::new().unwrap();

    for name in ["", "../escape", "a.b"] {
        assert!(
            SettingsManager::from_settings_dir(temp_dir.path().to_path_buf(), Some(name)).is_err(),
            "{name:?} should be rejected"
        );
    }
}

#[test]
fn test_infer_profile_non_toml_file() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings_dev.json");

    let manager = SettingsManager::from_path(settings_path).unwrap();

    assert_eq!(manager.current_profile(), None);
}
