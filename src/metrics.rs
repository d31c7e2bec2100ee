// Performance metrics module
//
// Provides lightweight counters for monitoring runs

use crate::models::RunOutcome;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Engine metrics
///
/// Uses atomic operations for thread-safe tracking without locks. Counters
/// accumulate for the lifetime of an engine and can be logged on shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Step events published to the renderer
    pub steps_emitted: AtomicU64,

    /// Manual advances that released a pending step
    pub advances: AtomicU64,

    /// Runs that reached their own termination condition
    pub runs_completed: AtomicU64,

    /// Runs that observed a stop request
    pub runs_stopped: AtomicU64,

    /// Runs that ended abnormally
    pub runs_faulted: AtomicU64,

    /// Total wall time spent inside runs, in milliseconds
    pub total_run_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            steps_emitted: AtomicU64::new(0),
            advances: AtomicU64::new(0),
            runs_completed: AtomicU64::new(0),
            runs_stopped: AtomicU64::new(0),
            runs_faulted: AtomicU64::new(0),
            total_run_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_step(&self) {
        self.steps_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_advance(&self) {
        self.advances.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how a run ended and how long it took
    pub fn record_run(&self, outcome: &RunOutcome, elapsed: Duration) {
        let counter = match outcome {
            RunOutcome::Stopped => &self.runs_stopped,
            RunOutcome::Faulted { .. } => &self.runs_faulted,
            _ => &self.runs_completed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.total_run_time_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn runs_finished(&self) -> u64 {
        self.runs_completed.load(Ordering::Relaxed)
            + self.runs_stopped.load(Ordering::Relaxed)
            + self.runs_faulted.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average run time in milliseconds
    pub fn avg_run_time_ms(&self) -> f64 {
        let total = self.total_run_time_ms.load(Ordering::Relaxed);
        let count = self.runs_finished();
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Run Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Runs: {} completed, {} stopped, {} faulted",
            self.runs_completed.load(Ordering::Relaxed),
            self.runs_stopped.load(Ordering::Relaxed),
            self.runs_faulted.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Run time: {:.2}s (avg: {:.2}ms per run)",
            self.total_run_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.avg_run_time_ms()
        );
        tracing::info!(
            "Steps emitted: {}, manual advances: {}",
            self.steps_emitted.load(Ordering::Relaxed),
            self.advances.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.steps_emitted.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.runs_finished(), 0);
    }

    #[test]
    fn test_record_run_outcomes() {
        let metrics = Metrics::new();

        metrics.record_run(&RunOutcome::Sorted, Duration::from_millis(100));
        metrics.record_run(&RunOutcome::NotFound, Duration::from_millis(100));
        metrics.record_run(&RunOutcome::Stopped, Duration::from_millis(40));
        metrics.record_run(
            &RunOutcome::Faulted {
                message: "index out of bounds".to_string(),
            },
            Duration::from_millis(60),
        );

        assert_eq!(metrics.runs_completed.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.runs_stopped.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.runs_faulted.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.total_run_time_ms.load(Ordering::Relaxed), 300);
        assert_eq!(metrics.avg_run_time_ms(), 75.0);
    }

    #[test]
    fn test_avg_run_time_no_runs() {
        let metrics = Metrics::new();
        assert_eq!(metrics.avg_run_time_ms(), 0.0);
    }

    #[test]
    fn test_step_and_advance_counters() {
        let metrics = Metrics::new();

        metrics.record_step();
        metrics.record_step();
        metrics.record_advance();

        assert_eq!(metrics.steps_emitted.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.advances.load(Ordering::Relaxed), 1);
    }
}
