//! Solver event types.
//!
//! Lightweight value types emitted by the implicit solver. They carry the
//! same quantities the solver's own diagnostic log line reports, so a sink
//! can reconstruct the full convergence history of a step.

use serde::{Deserialize, Serialize};

/// An event emitted during one implicit solve.
///
/// Events are tagged with the simulation step that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverEvent {
    /// Simulation step number (0-indexed).
    pub step: u32,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventKind {
    /// An implicit solve started.
    StepBegin {
        /// Time step being integrated (seconds).
        dt: f32,
    },

    /// One conjugate-residual iteration completed.
    SolverIteration {
        /// Iteration number within the solve.
        iteration: u32,
        /// ⟨r, Ar⟩ before the velocity/residual update.
        r_ar: f64,
        /// Step length along the search direction.
        alpha: f64,
        /// Direction-update coefficient.
        beta: f64,
        /// Squared residual norm Σ‖r‖² after the update.
        residual: f64,
    },

    /// Convergence report for the whole solve.
    Convergence {
        /// Total iterations used.
        iterations: u32,
        /// Final squared residual norm.
        final_residual: f64,
        /// Whether the residual fell below the threshold in budget.
        converged: bool,
    },
}

impl SolverEvent {
    /// Creates a new event for the given simulation step.
    pub fn new(step: u32, kind: EventKind) -> Self {
        Self { step, kind }
    }
}
