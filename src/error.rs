//! Error types for the optimization engine.

/// Errors raised by the optimizer, the dominance utility and the
/// selection strategies.
///
/// Every error is fatal to the operation that produced it. A failed epoch
/// leaves the decision to retry or abort with the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmoError {
    /// A required construction argument was not supplied.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// Two decision vectors being compared have different lengths.
    #[error("decision vectors differ in length: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A strategy needs an objective component the decision vector lacks.
    #[error("objective {index} requested from a decision vector of length {len}")]
    MissingObjective { index: usize, len: usize },

    /// A worker task panicked during a parallel phase.
    #[error("worker task panicked: {0}")]
    WorkerPanicked(String),

    /// The dedicated worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EmoError>;
