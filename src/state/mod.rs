// State management module
//
// This module provides the StateManager which wraps EngineState with thread-safe
// access using Arc<RwLock<T>>, emits change events for renderers and status lines,
// and mirrors the run state into a watch channel so suspended runners can wake
// up as soon as a stop is requested.

pub mod cancellation;

pub use cancellation::CancellationToken;

use crate::error::{EngineError, EngineResult};
use crate::models::{Algorithm, EngineState, RunOutcome, RunState, SchedulingMode, SpeedSetting};
use std::sync::{Arc, RwLock};
use tokio::sync::{broadcast, watch};

/// Change events emitted when engine state is modified
///
/// These events let a status display follow the engine without polling it.
/// Step-level detail goes through the [`crate::ui::Renderer`] instead.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// A runner claimed the run slot
    RunStarted { algorithm: Algorithm },

    /// A stop was requested for the active run
    StopRequested { algorithm: Option<Algorithm> },

    /// The runner task exited
    RunFinished {
        algorithm: Option<Algorithm>,
        outcome: Option<RunOutcome>,
    },

    /// Scheduling mode toggled
    ModeChanged { mode: SchedulingMode },

    /// Speed control moved
    SpeedChanged { raw: u32, label: &'static str },

    /// The working array was replaced
    ArrayReplaced { len: usize },

    /// Status line changed
    StatusChanged { status: String },
}

/// Thread-safe engine state with event emission
///
/// This is the central state component that:
/// - Provides thread-safe access to [`EngineState`] via `Arc<RwLock<T>>`
/// - Detects state changes and emits [`StateChange`] events
/// - Validates run-slot transitions (one run at a time)
/// - Publishes the current [`RunState`] on a `tokio::sync::watch` channel
///
/// # Usage
///
/// - [`read()`](Self::read) for reading state
/// - [`update()`](Self::update) for mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to state changes
/// - [`watch_run_state()`](Self::watch_run_state) for awaiting run-state transitions
///
/// # Related Types
///
/// - [`crate::models::EngineState`]: The underlying state structure
/// - [`CancellationToken`]: Runner-facing view over the run slot
/// - [`crate::engine::Engine`]: Primary owner and consumer
pub struct StateManager {
    /// The engine state protected by RwLock for thread-safe access
    state: Arc<RwLock<EngineState>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,

    /// Latest run state, for tasks that need to await a transition
    run_tx: Arc<watch::Sender<RunState>>,
}

impl StateManager {
    /// Create a new StateManager with a fresh Idle state
    ///
    /// # Returns
    /// A new StateManager with a broadcast channel buffer of 100 events
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        let (run_tx, _) = watch::channel(RunState::Idle);
        Self {
            state: Arc::new(RwLock::new(EngineState::default())),
            state_tx,
            run_tx: Arc::new(run_tx),
        }
    }

    /// Get a cloned snapshot of the current state
    pub fn snapshot(&self) -> EngineState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let mode = state_manager.read(|state| state.mode);
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&EngineState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// This is the only way to modify state. It:
    /// 1. Captures the old state
    /// 2. Applies the update function
    /// 3. Detects what changed and emits the matching events
    /// 4. Publishes the run state if it changed
    ///
    /// # Returns
    /// A vector of StateChange events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut EngineState),
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = self.detect_changes(&old_state, &state);

        if old_state.run_state != state.run_state {
            self.run_tx.send_replace(state.run_state);
        }

        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    /// Receiver that observes every run-state transition
    pub fn watch_run_state(&self) -> watch::Receiver<RunState> {
        self.run_tx.subscribe()
    }

    /// Detect what changed between two states and generate events
    fn detect_changes(&self, old: &EngineState, new: &EngineState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.run_state != new.run_state {
            match (old.run_state, new.run_state) {
                (_, RunState::Running) => {
                    if let Some(algorithm) = new.algorithm {
                        changes.push(StateChange::RunStarted { algorithm });
                    }
                }
                (RunState::Running, RunState::Stopping) => {
                    changes.push(StateChange::StopRequested {
                        algorithm: old.algorithm,
                    })
                }
                (_, RunState::Idle | RunState::Stopped) => {
                    changes.push(StateChange::RunFinished {
                        algorithm: new.last_algorithm,
                        outcome: new.last_outcome.clone(),
                    })
                }
                _ => {}
            }
        }

        if old.mode != new.mode {
            changes.push(StateChange::ModeChanged { mode: new.mode });
        }

        if old.speed != new.speed {
            changes.push(StateChange::SpeedChanged {
                raw: new.speed.raw(),
                label: new.speed.label(),
            });
        }

        if old.status != new.status {
            changes.push(StateChange::StatusChanged {
                status: new.status.clone(),
            });
        }

        changes
    }

    // Convenience methods for common state updates

    /// True only while the run state is Running
    pub fn is_running(&self) -> bool {
        self.read(|s| s.is_running())
    }

    /// Claim the run slot for `algorithm`
    ///
    /// Fails with [`EngineError::InvariantViolation`] when a runner is still
    /// running or unwinding; callers must stop and drain the previous run first.
    pub fn begin_run(&self, algorithm: Algorithm) -> EngineResult<Vec<StateChange>> {
        let mut rejected = None;
        let changes = self.update(|state| {
            if state.is_busy() {
                rejected = Some(state.run_state);
                return;
            }
            state.run_state = RunState::Running;
            state.algorithm = Some(algorithm);
            state.runs_started += 1;
            state.status = format!("Running {}... {}", algorithm, algorithm.complexity());
        });

        match rejected {
            Some(current) => Err(EngineError::InvariantViolation(format!(
                "cannot start {} while run state is {}",
                algorithm,
                current.as_str()
            ))),
            None => Ok(changes),
        }
    }

    /// Move Running to Stopping; no effect in any other state
    pub fn request_stop(&self) -> Vec<StateChange> {
        self.update(|state| {
            if state.run_state == RunState::Running {
                state.run_state = RunState::Stopping;
                state.algorithm = None;
                state.status = "Stopping...".to_string();
            }
        })
    }

    /// Release the run slot once the runner task has exited
    ///
    /// A run that unwound on a stop ends in Stopped; any other outcome
    /// returns to Idle, even if a stop arrived after the runner's last check.
    pub fn finish_run(&self, algorithm: Algorithm, outcome: RunOutcome) -> Vec<StateChange> {
        self.update(|state| {
            state.run_state = if outcome.is_stopped() {
                RunState::Stopped
            } else {
                RunState::Idle
            };
            state.algorithm = None;
            state.last_algorithm = Some(algorithm);
            state.last_outcome = Some(outcome);
            state.status = state.idle_status();
        })
    }

    /// Switch between manual stepping and timed playback
    pub fn set_mode(&self, mode: SchedulingMode) -> Vec<StateChange> {
        self.update(|state| state.mode = mode)
    }

    /// Record a new raw speed value
    pub fn set_speed(&self, speed: SpeedSetting) -> Vec<StateChange> {
        self.update(|state| state.speed = speed)
    }

    /// Replace the status line
    pub fn set_status(&self, status: impl Into<String>) -> Vec<StateChange> {
        let status = status.into();
        self.update(|state| state.status = status)
    }

    /// Record that the working array was replaced
    pub fn array_replaced(&self, len: usize) -> Vec<StateChange> {
        let mut changes = self.update(|state| {
            state.array_len = len;
            if !state.is_busy() {
                state.last_outcome = None;
                state.last_algorithm = None;
                state.status = state.idle_status();
            }
        });

        let replaced = StateChange::ArrayReplaced { len };
        let _ = self.state_tx.send(replaced.clone());
        changes.push(replaced);

        changes
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

// Make StateManager cloneable for sharing across tasks
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
            run_tx: Arc::clone(&self.run_tx),
        }
    }
}
