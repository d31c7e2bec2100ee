use serde::Serialize;

use crate::models::run::{Algorithm, RunOutcome, RunState, SchedulingMode, SpeedSetting};

/// Single source of truth for the engine's observable status.
///
/// # Thread Safety
///
/// `EngineState` is wrapped in `Arc<RwLock<EngineState>>` by
/// [`crate::state::StateManager`]. Never mutate it directly - go through
/// [`update()`](crate::state::StateManager::update) so change events are
/// emitted and the run-state watch channel stays in sync.
///
/// # Related Types
///
/// - [`crate::state::StateManager`]: Thread-safe wrapper with event emission
/// - [`crate::state::CancellationToken`]: Run-state view used by runners
/// - [`crate::scheduler::SuspensionController`]: Reads `mode` and `speed`
#[derive(Clone, Debug, Default, Serialize)]
pub struct EngineState {
    // Run slot
    pub run_state: RunState,
    pub algorithm: Option<Algorithm>,

    // Scheduling
    pub mode: SchedulingMode,
    pub speed: SpeedSetting,

    // Array bookkeeping
    pub array_len: usize,

    // Status line for the renderer
    pub status: String,

    // Results
    pub last_algorithm: Option<Algorithm>,
    pub last_outcome: Option<RunOutcome>,
    pub runs_started: usize,
}

impl EngineState {
    /// True only while a runner owns the run slot and no stop was requested
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// True while a runner task is still alive (running or unwinding)
    pub fn is_busy(&self) -> bool {
        matches!(self.run_state, RunState::Running | RunState::Stopping)
    }

    /// Status line shown when the engine is not running anything
    pub fn idle_status(&self) -> String {
        match (&self.last_algorithm, &self.last_outcome) {
            (_, Some(RunOutcome::Stopped)) => "Operation stopped.".to_string(),
            (Some(alg), Some(outcome)) => format!("{} {}", alg, outcome),
            _ if self.array_len > 0 => {
                "Array generated. Select an algorithm to begin.".to_string()
            }
            _ => "Generate an array to begin.".to_string(),
        }
    }
}
