//! Error types for the Firn engine.
//!
//! All crates return `FirnResult<T>` from fallible operations.
//!
//! These cover boundary-contract violations only. Numerical degeneracies
//! inside the solve (zero node mass, zero CR denominators, non-convergence)
//! are handled by explicit policy and never surface as errors.

use thiserror::Error;

/// Unified error type for the Firn engine.
#[derive(Debug, Error)]
pub enum FirnError {
    /// Input arrays disagree on length (nodes vs. grid, weights vs. particles).
    #[error("Mismatched buffers: {0}")]
    MismatchedBuffers(String),

    /// A weight-cache entry points at a node outside the grid.
    #[error("Particle {particle} references node {index}, but the grid has {node_count} nodes")]
    NodeIndexOutOfRange {
        particle: usize,
        index: i32,
        node_count: usize,
    },

    /// Grid description is malformed (zero extent, non-positive cell size).
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for `Result<T, FirnError>`.
pub type FirnResult<T> = Result<T, FirnError>;
