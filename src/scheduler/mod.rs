//! Cooperative scheduling for algorithm runners.
//!
//! Runners never sleep or block on their own. After each observable
//! micro-step they call [`SuspensionController::await_step`], which either
//! parks them on the [`AdvanceLatch`] until an advance (manual mode) or sleeps
//! for the speed-derived delay (timed mode). Visual phases that must pace
//! themselves regardless of mode use [`SuspensionController::delay`].
//!
//! Suspension never decides whether a run continues. A stop request wakes any
//! suspended runner early, and the runner's own check right after
//! `await_step` returns is what turns it into [`crate::EngineError::Stopped`].

pub mod latch;
pub mod speed;

pub use latch::AdvanceLatch;
pub use speed::{DEFAULT_MIN_DELAY, animation_speed, phase_delay, step_delay};

use crate::models::{RunState, SchedulingMode};
use crate::state::StateManager;
use std::time::Duration;

/// Decides how a runner is suspended at each designated point
#[derive(Clone)]
pub struct SuspensionController {
    state: StateManager,
    latch: AdvanceLatch,
    min_delay: Duration,
}

impl SuspensionController {
    /// Create a controller reading mode and speed from `state`
    ///
    /// # Arguments
    /// * `state` - Engine state holding the scheduling mode and speed
    /// * `latch` - Latch shared with the cancellation token so a stop can force-release it
    /// * `min_delay` - Floor for every computed delay
    pub fn new(state: StateManager, latch: AdvanceLatch, min_delay: Duration) -> Self {
        Self {
            state,
            latch,
            min_delay,
        }
    }

    /// Suspend after a completed micro-step
    ///
    /// Manual mode parks on a fresh pending advance; timed mode sleeps for the
    /// delay computed from the current speed. Either way the wait ends early
    /// once the run state leaves Running.
    pub async fn await_step(&self) {
        let (mode, speed) = self.state.read(|s| (s.mode, s.speed));
        let mut run_rx = self.state.watch_run_state();
        let stop = async move {
            let _ = run_rx.wait_for(|s| *s != RunState::Running).await;
        };

        match mode {
            SchedulingMode::Manual => {
                let advance = self.latch.arm();
                tokio::select! {
                    _ = advance => {}
                    _ = stop => {
                        // Leave no stale waiter behind
                        self.latch.release();
                    }
                }
            }
            SchedulingMode::Timed => {
                let delay = step_delay(speed, self.min_delay);
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = stop => {}
                }
            }
        }
    }

    /// Sleep for exactly `duration` (floored), whatever the mode
    pub async fn delay(&self, duration: Duration) {
        tokio::time::sleep(duration.max(self.min_delay)).await;
    }

    /// Duration of a visual phase lasting `units` fifths of the current step delay
    pub fn phase(&self, units: u32) -> Duration {
        let speed = self.state.read(|s| s.speed);
        phase_delay(speed, units, self.min_delay)
    }

    /// Release the pending manual step, if any
    ///
    /// # Returns
    /// `true` if a suspended runner was released
    pub fn advance(&self) -> bool {
        let released = self.latch.release();
        if released {
            tracing::debug!("Advanced one step");
        } else {
            tracing::debug!("Advance ignored - no step is pending");
        }
        released
    }

    /// True while a runner is parked waiting for an advance
    pub fn is_waiting(&self) -> bool {
        self.latch.is_pending()
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }
}
