// AlgoViz - Stepwise sorting and searching visualizer engine
//
// This is the library crate containing the engine, the algorithm runners and
// the data they share. The binary crate (main.rs) provides a terminal front-end.

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use models::{
    Algorithm, RunOutcome, RunReport, RunState, SchedulingMode, SearchOutcome, SpeedSetting,
    StepEvent, StepKind, UserConfig, VisualizerSettings,
};
pub use state::{StateChange, StateManager};
pub use ui::Renderer;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
