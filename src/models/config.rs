use serde::{Deserialize, Serialize};

use crate::models::run::DEFAULT_SPEED;

/// User configuration from `algoviz.yaml`
///
/// Contains visualizer defaults and logging preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub visualizer: VisualizerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizerSettings {
    /// Raw speed slider value (1-100)
    #[serde(default = "default_speed")]
    pub speed: u32,

    /// Start in manual step mode
    #[serde(default)]
    pub step_mode: bool,

    /// Length of randomly generated arrays
    #[serde(default = "default_array_length")]
    pub array_length: usize,

    #[serde(default = "default_min_value")]
    pub min_value: i64,

    #[serde(default = "default_max_value")]
    pub max_value: i64,

    /// Floor applied to every computed delay, in milliseconds
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    #[serde(default)]
    pub debug_mode: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            step_mode: false,
            array_length: default_array_length(),
            min_value: default_min_value(),
            max_value: default_max_value(),
            min_delay_ms: default_min_delay_ms(),
            debug_mode: false,
            log_dir: default_log_dir(),
        }
    }
}

fn default_speed() -> u32 {
    DEFAULT_SPEED
}

fn default_array_length() -> usize {
    10
}

fn default_min_value() -> i64 {
    1
}

fn default_max_value() -> i64 {
    100
}

fn default_min_delay_ms() -> u64 {
    10
}

fn default_log_dir() -> String {
    "logs".to_string()
}
