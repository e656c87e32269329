//! Particle records.
//!
//! Particles are owned by the enclosing simulation and mutated by the
//! explicit-step and plasticity-update stages between time steps. During
//! the implicit solve they are strictly read-only.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use firn_types::Scalar;

use crate::material::Material;

/// One material point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    /// World position. Unused by the velocity solve itself; the weight
    /// cache already encodes which nodes cover this particle.
    pub position: Vec3,
    /// Elastic deformation gradient Fᵉ.
    pub elastic_f: Mat3,
    /// Plastic deformation gradient Fᵖ.
    pub plastic_f: Mat3,
    /// Reference volume.
    pub volume: Scalar,
    /// Material parameters.
    pub material: Material,
}

impl Particle {
    /// A particle in its rest configuration (both gradients identity).
    pub fn at_rest(position: Vec3, volume: Scalar, material: Material) -> Self {
        Self {
            position,
            elastic_f: Mat3::IDENTITY,
            plastic_f: Mat3::IDENTITY,
            volume,
            material,
        }
    }
}
