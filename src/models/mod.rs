//! Data models for the visualizer engine.
//!
//! This module contains the plain data the engine passes around:
//! - [`ArrayStore`]: Owner of the working array for the current run
//! - [`StepEvent`]: Immutable snapshot of one observable micro-step, built from a [`Step`]
//! - [`EngineState`]: Run slot, scheduling mode, speed and status line
//! - [`Algorithm`], [`RunState`], [`SchedulingMode`], [`SpeedSetting`]: Small enums and settings
//! - [`RunOutcome`], [`RunReport`], [`SearchOutcome`]: How a run ended
//! - [`UserConfig`]: Settings loaded from `algoviz.yaml`

pub mod array_store;
pub mod config;
pub mod engine_state;
pub mod run;
pub mod step;

pub use array_store::{ArrayStore, is_sorted};
pub use config::{UserConfig, VisualizerSettings};
pub use engine_state::EngineState;
pub use run::{
    Algorithm, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED, RunOutcome, RunReport, RunState,
    SchedulingMode, SearchOutcome, SpeedSetting,
};
pub use step::{Mark, Role, Side, Step, StepEvent, StepKind, StepMeta};
