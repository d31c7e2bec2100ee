use thiserror::Error;

/// Errors produced by the visualizer engine
///
/// `Stopped` is not a failure: it is how a runner unwinds after observing a
/// stop request at a suspension boundary. Callers should map it to a
/// stopped status rather than reporting it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Operation stopped")]
    Stopped,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Engine invariant violated: {0}")]
    InvariantViolation(String),
}

impl EngineError {
    /// True for the cooperative stop signal, false for real errors
    pub fn is_stopped(&self) -> bool {
        matches!(self, EngineError::Stopped)
    }
}

/// Result alias used throughout the engine
pub type EngineResult<T> = Result<T, EngineError>;
