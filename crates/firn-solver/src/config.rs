//! Solver configuration.

use serde::{Deserialize, Serialize};

use firn_types::constants::{
    DEFAULT_IMPLICIT_BLEND, DEFAULT_MAX_ITERATIONS, DEFAULT_RESIDUAL_THRESHOLD,
};
use firn_types::{FirnError, FirnResult};

/// Tuning parameters for the implicit velocity solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Implicit blend factor β ∈ [0, 1]. 0 is fully explicit (the solve
    /// degenerates to the identity), 1 fully implicit, 0.5 trapezoidal.
    pub implicit_blend: f32,
    /// Iteration cap. The solver accepts the current iterate when the cap
    /// is reached, converged or not.
    pub max_iterations: u32,
    /// Convergence threshold on the squared residual ⟨r, r⟩.
    pub residual_threshold: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            implicit_blend: DEFAULT_IMPLICIT_BLEND,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            residual_threshold: DEFAULT_RESIDUAL_THRESHOLD,
        }
    }
}

impl SolverConfig {
    /// Loose settings for fast iteration while debugging a scene.
    pub fn debug() -> Self {
        Self {
            max_iterations: 5,
            residual_threshold: 1.0e-4,
            ..Self::default()
        }
    }

    /// Tight settings for final-quality output.
    pub fn high_quality() -> Self {
        Self {
            max_iterations: 30,
            residual_threshold: 1.0e-8,
            ..Self::default()
        }
    }

    /// Reject parameter combinations the solver cannot run with.
    pub fn validate(&self) -> FirnResult<()> {
        if !(0.0..=1.0).contains(&self.implicit_blend) {
            return Err(FirnError::InvalidConfig(format!(
                "implicit_blend must be in [0, 1], got {}",
                self.implicit_blend
            )));
        }
        if self.max_iterations == 0 {
            return Err(FirnError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !(self.residual_threshold > 0.0) {
            return Err(FirnError::InvalidConfig(format!(
                "residual_threshold must be positive, got {}",
                self.residual_threshold
            )));
        }
        Ok(())
    }
}
