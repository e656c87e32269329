//! # firn-math
//!
//! Linear algebra primitives for the Firn simulation engine.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, `Mat3`, etc.)
//! - 3×3 matrix helpers (outer product, double contraction, cofactor)
//! - Polar decomposition (Newton iteration, robust for degenerate input)
//! - Closed-form differentials of the rotation factor and the cofactor,
//!   needed to linearize the snow constitutive model

pub mod differential;
pub mod mat3;
pub mod polar;

pub use mat3::{cofactor, ddot, outer_product};
pub use polar::{polar_decompose, PolarDecomposition};

// Re-export glam types as the canonical math types for Firn.
pub use glam::{Mat3, Quat, Vec3};
