use crate::error::EngineResult;
use crate::metrics::Metrics;
use crate::models::{Algorithm, ArrayStore, Step};
use crate::scheduler::SuspensionController;
use crate::state::CancellationToken;
use crate::ui::Renderer;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Everything one run needs, bundled for the runners
///
/// Runners own no state of their own. They mutate the store, then hand each
/// completed micro-step to [`step()`](Self::step), which publishes it, suspends
/// and re-checks cancellation in that order. Any `Err(Stopped)` coming out of
/// these helpers must be propagated with `?` straight away.
pub struct RunContext {
    algorithm: Algorithm,
    store: Arc<ArrayStore>,
    controller: SuspensionController,
    token: CancellationToken,
    renderer: Arc<dyn Renderer>,
    metrics: Arc<Metrics>,
    seq: AtomicU64,
}

impl RunContext {
    pub fn new(
        algorithm: Algorithm,
        store: Arc<ArrayStore>,
        controller: SuspensionController,
        token: CancellationToken,
        renderer: Arc<dyn Renderer>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            algorithm,
            store,
            controller,
            token,
            renderer,
            metrics,
            seq: AtomicU64::new(0),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn store(&self) -> &ArrayStore {
        &self.store
    }

    /// Loop-top check
    pub fn ensure_running(&self) -> EngineResult<()> {
        self.token.check()
    }

    /// Publish a step without suspending
    ///
    /// Used for steps whose pacing is a fixed visual phase rather than a
    /// scheduler step; follow it with [`pause()`](Self::pause).
    pub fn emit(&self, step: Step) -> EngineResult<()> {
        self.ensure_running()?;
        self.publish(step);
        Ok(())
    }

    /// Publish a completed micro-step, suspend, then check for a stop
    pub async fn step(&self, step: Step) -> EngineResult<()> {
        self.ensure_running()?;
        self.publish(step);
        self.controller.await_step().await;
        self.ensure_running()
    }

    /// Suspend at a scheduler step without publishing anything
    pub async fn suspend(&self) -> EngineResult<()> {
        self.controller.await_step().await;
        self.ensure_running()
    }

    /// Hold a visual phase for `units` fifths of the step delay, then check for a stop
    pub async fn pause(&self, units: u32) -> EngineResult<()> {
        self.controller.delay(self.controller.phase(units)).await;
        self.ensure_running()
    }

    /// Steps published so far in this run
    pub fn steps_emitted(&self) -> u64 {
        self.seq.load(Ordering::Relaxed)
    }

    fn publish(&self, step: Step) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let event = step.into_event(seq, self.algorithm, self.store.snapshot());
        tracing::trace!(
            "{} step {}: {} {:?}",
            self.algorithm.id(),
            seq,
            event.kind,
            event.indices()
        );
        self.metrics.record_step();
        self.renderer.on_step(&event);
    }
}
