//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - Configuration loading and saving
//! - Default configuration when the file is absent
//! - Environment overrides layered over the file
//! - Invalid YAML handling
//! - Settings flowing into a new Engine

use algoviz::config::USER_CONFIG_FILE;
use algoviz::ui::NullRenderer;
use algoviz::{ConfigManager, Engine, SchedulingMode, UserConfig};
use camino::Utf8PathBuf;
use config::Map;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

/// Manager reading overrides from a prefix no other test touches
fn manager(config_path: &Utf8PathBuf, prefix: &str) -> ConfigManager {
    ConfigManager::new(config_path)
        .unwrap()
        .with_env_prefix(prefix)
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
    assert_eq!(manager.user_config_path(), config_path.join(USER_CONFIG_FILE));
}

#[test]
fn test_load_default_user_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = manager(&config_path, "ALGOVIZ_TEST_DEFAULTS");

    let config = manager.load_user_config().unwrap();

    assert_eq!(config.visualizer.speed, 50);
    assert!(!config.visualizer.step_mode);
    assert_eq!(config.visualizer.array_length, 10);
    assert_eq!(config.visualizer.min_value, 1);
    assert_eq!(config.visualizer.max_value, 100);
    assert_eq!(config.visualizer.min_delay_ms, 10);
    assert_eq!(config.visualizer.log_dir, "logs");
}

#[test]
fn test_save_and_load_user_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = manager(&config_path, "ALGOVIZ_TEST_ROUNDTRIP");

    let mut config = UserConfig::default();
    config.visualizer.speed = 15;
    config.visualizer.array_length = 32;
    config.visualizer.min_value = -20;
    manager.save_user_config(&config).unwrap();

    let yaml = fs::read_to_string(manager.user_config_path()).unwrap();
    assert!(yaml.contains("visualizer:"));

    let loaded = manager.load_user_config().unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_environment_overrides_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let vars = Map::from([(
        "ALGOVIZ_TEST_ENV__VISUALIZER__SPEED".to_string(),
        "75".to_string(),
    )]);
    let manager = manager(&config_path, "ALGOVIZ_TEST_ENV").with_env_source(vars);
    fs::write(
        manager.user_config_path(),
        "visualizer:\n  speed: 20\n  array_length: 12\n",
    )
    .unwrap();

    let loaded = manager.load_user_config().unwrap();

    assert_eq!(loaded.visualizer.speed, 75);
    assert_eq!(loaded.visualizer.array_length, 12);
}

#[test]
fn test_invalid_yaml_handling() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = manager(&config_path, "ALGOVIZ_TEST_INVALID");

    fs::write(manager.user_config_path(), "visualizer: [unclosed").unwrap();

    let result = manager.load_user_config();
    assert!(result.is_err(), "Should fail to parse invalid YAML");
}

#[test]
fn test_config_directory_creation() {
    let (_temp_dir, base) = create_test_config_dir();
    let config_path = base.join("nested").join("config");
    assert!(!config_path.exists());

    let _manager = ConfigManager::new(&config_path).unwrap();

    assert!(config_path.exists());
}

#[tokio::test]
async fn test_settings_flow_into_engine() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = manager(&config_path, "ALGOVIZ_TEST_ENGINE");
    fs::write(
        manager.user_config_path(),
        "visualizer:\n  speed: 90\n  step_mode: true\n",
    )
    .unwrap();

    let settings = manager.load_user_config().unwrap().visualizer;
    let engine = Engine::new(Arc::new(NullRenderer), &settings);
    let state = engine.state();

    assert_eq!(state.mode, SchedulingMode::Manual);
    assert_eq!(state.speed.raw(), 90);
    assert_eq!(state.speed.label(), "Very Fast");
}
