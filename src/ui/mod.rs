// UI module - the seam between the engine and whatever draws the array
//
// This module contains:
// - Renderer: the trait the engine emits step events through
// - ChannelRenderer: forwards events into a tokio channel (headless consumers, tests)
// - TerminalRenderer: prints one line per step (used by the CLI)

pub mod channel;
pub mod terminal;

pub use channel::ChannelRenderer;
pub use terminal::TerminalRenderer;

use crate::models::StepEvent;

/// Consumer of step events
///
/// Called from the runner task, in emission order, once per step. The engine
/// does not wait for drawing beyond the call itself, so implementations
/// should hand the event off quickly.
#[cfg_attr(test, mockall::automock)]
pub trait Renderer: Send + Sync {
    fn on_step(&self, event: &StepEvent);
}

/// Renderer that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn on_step(&self, _event: &StepEvent) {}
}
