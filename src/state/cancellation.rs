use crate::error::{EngineError, EngineResult};
use crate::models::{Algorithm, RunState};
use crate::scheduler::AdvanceLatch;
use crate::state::StateManager;

/// Runner-facing view of the single run slot.
///
/// Every runner checks [`is_running()`](Self::is_running) at the top of each
/// loop iteration and right after each suspension. A stop flips the run state
/// to Stopping and force-releases any pending manual advance, so a runner
/// parked in manual mode is never starved.
#[derive(Clone)]
pub struct CancellationToken {
    state: StateManager,
    latch: AdvanceLatch,
}

impl CancellationToken {
    pub fn new(state: StateManager, latch: AdvanceLatch) -> Self {
        Self { state, latch }
    }

    /// Claim the run slot for `algorithm` (Idle or Stopped to Running)
    pub fn begin(&self, algorithm: Algorithm) -> EngineResult<()> {
        self.state.begin_run(algorithm)?;
        tracing::info!("Run started: {}", algorithm);
        Ok(())
    }

    /// Ask the active run to stop
    ///
    /// Has no observable effect unless the run state is Running.
    ///
    /// # Returns
    /// `true` if a running run was asked to stop
    pub fn request_stop(&self) -> bool {
        let changes = self.state.request_stop();
        if changes.is_empty() {
            return false;
        }

        let released = self.latch.release();
        tracing::info!(
            "Stop requested (pending advance released: {})",
            released
        );
        true
    }

    /// True only while the run state is Running
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// `Err(Stopped)` once a stop has been requested
    pub fn check(&self) -> EngineResult<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(EngineError::Stopped)
        }
    }

    pub fn run_state(&self) -> RunState {
        self.state.read(|s| s.run_state)
    }
}
