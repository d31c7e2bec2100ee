// ChannelRenderer - Hands step events to another task
//
// The engine emits steps from its runner task; a headless consumer (a test, a
// recorder, a front-end living on its own event loop) usually wants them on a
// receiver it can await. The channel is unbounded so no step is ever dropped
// or reordered; the runner's own suspension is what paces the stream.

use crate::models::StepEvent;
use crate::ui::Renderer;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// Renderer that forwards every step event into a tokio mpsc channel
///
/// # Example
/// ```ignore
/// let (renderer, mut steps) = ChannelRenderer::new();
/// let engine = Engine::new(Arc::new(renderer), &settings);
///
/// engine.start_sort(Algorithm::BubbleSort, vec![5, 3, 8, 1]).await?;
/// while let Some(event) = steps.recv().await {
///     println!("{} {:?}", event.kind, event.indices());
/// }
/// ```
pub struct ChannelRenderer {
    tx: mpsc::UnboundedSender<StepEvent>,

    /// Set once the receiver is gone so the warning is logged a single time
    closed: AtomicBool,
}

impl ChannelRenderer {
    /// Create a renderer and the receiver that observes its events
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StepEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                closed: AtomicBool::new(false),
            },
            rx,
        )
    }
}

impl Renderer for ChannelRenderer {
    fn on_step(&self, event: &StepEvent) {
        if self.tx.send(event.clone()).is_err() && !self.closed.swap(true, Ordering::Relaxed) {
            tracing::warn!("Step receiver dropped - further steps are discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Algorithm, Role, Step, StepKind};

    fn event(seq: u64) -> StepEvent {
        Step::new(StepKind::Compare)
            .mark(0, Role::Compared)
            .into_event(seq, Algorithm::BubbleSort, vec![2, 1])
    }

    #[test]
    fn test_events_arrive_in_order() {
        let (renderer, mut rx) = ChannelRenderer::new();

        for seq in 1..=3 {
            renderer.on_step(&event(seq));
        }

        let seqs: Vec<u64> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.seq)
            .collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn test_dropped_receiver_is_tolerated() {
        let (renderer, rx) = ChannelRenderer::new();
        drop(rx);

        renderer.on_step(&event(1));
        renderer.on_step(&event(2));

        assert!(renderer.closed.load(Ordering::Relaxed));
    }
}
