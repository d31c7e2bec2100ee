//! Engine facade - the single entry point a front-end talks to.
//!
//! The [`Engine`] owns one [`ArrayStore`], one [`StateManager`] and the
//! scheduling primitives built on them. It exposes the external interface of
//! the visualizer:
//!
//! - [`start_run()`](Engine::start_run) to run an algorithm over an array
//! - [`advance()`](Engine::advance) to release one manual step
//! - [`set_mode()`](Engine::set_mode) and [`set_speed()`](Engine::set_speed)
//! - [`request_stop()`](Engine::request_stop) to abandon the active run
//! - [`regenerate()`](Engine::regenerate) to replace the array
//!
//! # Run lifecycle
//!
//! A run lives in a spawned task holding the only permit of the run slot. A
//! new run first requests a stop, then waits for that permit, so two runners
//! never touch the store at the same time. The runner itself is spawned one
//! level deeper so a panic (an out-of-range store access) is caught at the
//! join and reported as [`RunOutcome::Faulted`] instead of taking the engine
//! down with it.

pub mod input;

use crate::error::{EngineError, EngineResult};
use crate::metrics::Metrics;
use crate::models::{
    Algorithm, ArrayStore, EngineState, RunOutcome, RunReport, SchedulingMode, SpeedSetting,
    VisualizerSettings,
};
use crate::scheduler::{AdvanceLatch, SuspensionController};
use crate::services::{self, RunContext, RunResult};
use crate::state::{CancellationToken, StateChange, StateManager};
use crate::ui::Renderer;
use std::any::Any;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Semaphore, broadcast};
use tokio::task::{JoinError, JoinHandle};

/// Runs allowed at once
const MAX_CONCURRENT_RUNS: usize = 1;

/// Stepwise algorithm execution engine
#[derive(Clone)]
pub struct Engine {
    store: Arc<ArrayStore>,
    state: StateManager,
    latch: AdvanceLatch,
    controller: SuspensionController,
    token: CancellationToken,
    renderer: Arc<dyn Renderer>,
    metrics: Arc<Metrics>,
    settings: VisualizerSettings,

    /// Serializes stop-then-claim so two starts cannot interleave
    start_lock: Arc<tokio::sync::Mutex<()>>,

    /// Held by the active run task until it has released the run state
    run_slot: Arc<Semaphore>,

    active: Arc<Mutex<Option<JoinHandle<RunReport>>>>,
}

impl Engine {
    /// Create an idle engine with an empty array
    ///
    /// Mode, speed and the delay floor come from `settings`.
    pub fn new(renderer: Arc<dyn Renderer>, settings: &VisualizerSettings) -> Self {
        let state = StateManager::new();
        let latch = AdvanceLatch::new();
        let controller = SuspensionController::new(
            state.clone(),
            latch.clone(),
            Duration::from_millis(settings.min_delay_ms),
        );
        let token = CancellationToken::new(state.clone(), latch.clone());

        let mode = if settings.step_mode {
            SchedulingMode::Manual
        } else {
            SchedulingMode::Timed
        };
        state.set_mode(mode);
        state.set_speed(SpeedSetting::new(settings.speed));

        Self {
            store: Arc::new(ArrayStore::default()),
            state,
            latch,
            controller,
            token,
            renderer,
            metrics: Arc::new(Metrics::new()),
            settings: settings.clone(),
            start_lock: Arc::new(tokio::sync::Mutex::new(())),
            run_slot: Arc::new(Semaphore::new(MAX_CONCURRENT_RUNS)),
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Start `algorithm` over `values`
    ///
    /// Input is validated before anything else happens: searches need a
    /// non-empty array and a numeric `target`; sorts ignore `target`. Any run
    /// still active is stopped and drained first. Returns once the new run
    /// owns the run slot; use [`wait()`](Self::wait) for its report.
    pub async fn start_run(
        &self,
        algorithm: Algorithm,
        values: Vec<i64>,
        target: Option<&str>,
    ) -> EngineResult<()> {
        let target = if algorithm.is_search() {
            if values.is_empty() {
                return Err(EngineError::InvalidInput(format!(
                    "{} needs a non-empty array",
                    algorithm
                )));
            }
            let raw = target.ok_or_else(|| {
                EngineError::InvalidInput(format!("{} needs a target", algorithm))
            })?;
            Some(input::parse_target(raw)?)
        } else {
            None
        };

        let _guard = self.start_lock.lock().await;
        self.request_stop();
        let permit = self
            .run_slot
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| EngineError::InvariantViolation("run slot closed".to_string()))?;

        self.store.replace(values);
        self.state.array_replaced(self.store.size());
        self.token.begin(algorithm)?;

        let ctx = Arc::new(RunContext::new(
            algorithm,
            self.store.clone(),
            self.controller.clone(),
            self.token.clone(),
            self.renderer.clone(),
            self.metrics.clone(),
        ));
        let state = self.state.clone();
        let metrics = self.metrics.clone();
        let store = self.store.clone();

        let handle = tokio::spawn(async move {
            let _permit = permit;
            let started = tokio::time::Instant::now();

            let runner = tokio::spawn({
                let ctx = ctx.clone();
                async move { services::execute(&ctx, target).await }
            });

            let (outcome, search) = match runner.await {
                Ok(Ok(RunResult::Sorted)) => (RunOutcome::Sorted, None),
                Ok(Ok(RunResult::Searched(found))) => {
                    let outcome = match found.index {
                        Some(index) => RunOutcome::Found { index },
                        None => RunOutcome::NotFound,
                    };
                    (outcome, Some(found))
                }
                Ok(Err(e)) if e.is_stopped() => (RunOutcome::Stopped, None),
                Ok(Err(e)) => {
                    tracing::error!("{} failed: {}", algorithm, e);
                    (
                        RunOutcome::Faulted {
                            message: e.to_string(),
                        },
                        None,
                    )
                }
                Err(e) => {
                    let message = join_error_message(e);
                    tracing::error!("{} faulted: {}", algorithm, message);
                    (RunOutcome::Faulted { message }, None)
                }
            };

            let elapsed = started.elapsed();
            state.finish_run(algorithm, outcome.clone());
            metrics.record_run(&outcome, elapsed);
            tracing::info!(
                "Run finished: {} {} ({} steps, {:.2}s)",
                algorithm,
                outcome,
                ctx.steps_emitted(),
                elapsed.as_secs_f64()
            );

            RunReport {
                algorithm,
                outcome,
                search,
                steps: ctx.steps_emitted(),
                elapsed,
                final_array: store.snapshot(),
            }
        });

        *self.active.lock().unwrap() = Some(handle);
        Ok(())
    }

    pub async fn start_sort(&self, algorithm: Algorithm, values: Vec<i64>) -> EngineResult<()> {
        self.start_run(algorithm, values, None).await
    }

    pub async fn start_search(
        &self,
        algorithm: Algorithm,
        values: Vec<i64>,
        target: &str,
    ) -> EngineResult<()> {
        self.start_run(algorithm, values, Some(target)).await
    }

    /// Wait for the most recently started run and take its report
    ///
    /// Returns `None` when no run has been started since the last call.
    pub async fn wait(&self) -> Option<RunReport> {
        let handle = self.active.lock().unwrap().take()?;
        match handle.await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!("Run task join error: {}", e);
                None
            }
        }
    }

    /// Release one pending manual step
    pub fn advance(&self) -> bool {
        let released = self.controller.advance();
        if released {
            self.metrics.record_advance();
        }
        released
    }

    /// Switch scheduling mode, effective at the next suspension
    ///
    /// Leaving manual mode also releases a step that is already parked so the
    /// run picks up timed playback straight away.
    pub fn set_mode(&self, mode: SchedulingMode) {
        self.state.set_mode(mode);
        tracing::debug!("Scheduling mode: {:?}", mode);
        if mode == SchedulingMode::Timed && self.latch.release() {
            tracing::debug!("Released pending step on switch to timed mode");
        }
    }

    pub fn toggle_mode(&self) -> SchedulingMode {
        let mode = self.state.read(|s| s.mode).toggled();
        self.set_mode(mode);
        mode
    }

    /// Apply a raw speed value; delays already being slept are not affected
    pub fn set_speed(&self, raw: u32) -> SpeedSetting {
        let speed = SpeedSetting::new(raw);
        self.state.set_speed(speed);
        tracing::debug!("Speed: {} ({})", speed.raw(), speed.label());
        speed
    }

    /// Ask the active run to stop; no effect unless a run is Running
    pub fn request_stop(&self) -> bool {
        self.token.request_stop()
    }

    /// Replace the array while no run is active
    pub fn replace_array(&self, values: Vec<i64>) -> EngineResult<()> {
        if self.state.read(|s| s.is_busy()) {
            return Err(EngineError::InvariantViolation(
                "cannot replace the array during a run".to_string(),
            ));
        }
        self.store.replace(values);
        self.state.array_replaced(self.store.size());
        Ok(())
    }

    /// Stop any active run, wait for it to exit, then replace the array
    pub async fn regenerate(&self, values: Vec<i64>) -> EngineResult<()> {
        let _guard = self.start_lock.lock().await;
        self.request_stop();
        let _permit = self
            .run_slot
            .acquire()
            .await
            .map_err(|_| EngineError::InvariantViolation("run slot closed".to_string()))?;
        self.replace_array(values)
    }

    /// Regenerate with random values from the configured length and range
    ///
    /// Arrays meant for binary search come out sorted.
    pub async fn generate_random(&self, for_search: bool) -> EngineResult<Vec<i64>> {
        let VisualizerSettings {
            array_length,
            min_value,
            max_value,
            ..
        } = self.settings;
        let values = if for_search {
            input::random_sorted_values(array_length, min_value, max_value)?
        } else {
            input::random_values(array_length, min_value, max_value)?
        };
        self.regenerate(values.clone()).await?;
        Ok(values)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state.subscribe()
    }

    pub fn snapshot_array(&self) -> Vec<i64> {
        self.store.snapshot()
    }

    pub fn state(&self) -> EngineState {
        self.state.snapshot()
    }

    pub fn status(&self) -> String {
        self.state.read(|s| s.status.clone())
    }

    /// True while a manual step is parked waiting for an advance
    pub fn is_waiting(&self) -> bool {
        self.controller.is_waiting()
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    pub fn settings(&self) -> &VisualizerSettings {
        &self.settings
    }
}

fn join_error_message(error: JoinError) -> String {
    if error.is_panic() {
        panic_message(error.into_panic())
    } else {
        "runner task cancelled".to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "runner panicked".to_string()
    }
}
