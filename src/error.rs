//! Error types for talkpage-threads.
//!
//! Heuristic ambiguity and missing structure are not errors: they are
//! reported as data (`TranscludedFrom::Unknown`, `None`). Only contract
//! violations and impossible tree states end up here.

/// Error type for range and thread item operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller broke an operation's precondition (e.g. a collapsed range
    /// passed to a boundary node accessor).
    #[error("Precondition violated: {0}")]
    PreconditionError(&'static str),

    /// An internal-consistency check failed. The input tree does not satisfy
    /// the ordering assumptions the comparison relies on.
    #[error("Inconsistent tree state: {0}")]
    InvariantError(String),

    /// Range boundaries are out of bounds or in the wrong order.
    #[error("Invalid range: {0}")]
    RangeError(String),

    /// Site configuration could not be used.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Result type alias for talk page operations.
pub type Result<T> = std::result::Result<T, Error>;
