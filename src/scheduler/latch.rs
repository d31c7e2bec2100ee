use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Slot for the single outstanding manual-step waiter.
///
/// [`arm()`](Self::arm) creates a one-shot pair and parks the sender here;
/// the suspended runner awaits the receiver. Whoever calls
/// [`release()`](Self::release) first (an advance or a stop) takes the sender
/// and fires it, so each waiter resumes exactly once. Releasing an empty slot
/// does nothing.
#[derive(Clone, Debug, Default)]
pub struct AdvanceLatch {
    pending: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl AdvanceLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new pending advance and return the side to await
    pub fn arm(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let previous = self.pending.lock().unwrap().replace(tx);
        if previous.is_some() {
            // Only one runner suspends at a time; a leftover sender means its
            // waiter already went away.
            tracing::warn!("Replacing a stale pending advance");
        }
        rx
    }

    /// Resume the pending waiter, if any
    ///
    /// # Returns
    /// `true` if a waiter was pending
    pub fn release(&self) -> bool {
        match self.pending.lock().unwrap().take() {
            // A dropped receiver still counts: its waiter is gone either way
            Some(tx) => {
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    /// True while a waiter is parked
    pub fn is_pending(&self) -> bool {
        self.pending.lock().unwrap().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn test_release_without_waiter_is_noop() {
        let latch = AdvanceLatch::new();
        assert!(!latch.release());
        assert!(!latch.is_pending());
    }

    #[test]
    fn test_release_wakes_waiter_once() {
        let latch = AdvanceLatch::new();
        let mut waiter = task::spawn(latch.arm());

        assert!(latch.is_pending());
        assert_pending!(waiter.poll());

        assert!(latch.release());
        assert!(waiter.is_woken());
        assert!(assert_ready!(waiter.poll()).is_ok());

        // The slot is empty again
        assert!(!latch.release());
    }

    #[test]
    fn test_clones_share_slot() {
        let latch = AdvanceLatch::new();
        let other = latch.clone();

        let _rx = latch.arm();
        assert!(other.is_pending());
        assert!(other.release());
        assert!(!latch.is_pending());
    }
}
