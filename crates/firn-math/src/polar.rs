//! Polar decomposition of 3×3 matrices.
//!
//! Factors F = R·S into an orthogonal rotation R and a symmetric
//! positive semi-definite stretch S. The implicit solver linearizes the
//! stress response about the polar factors of the trial elastic gradient.

use glam::Mat3;

use firn_types::constants::EPSILON;

use crate::mat3::ddot;

/// Iteration cap for the Newton polar iteration. Convergence is
/// quadratic, so well-conditioned input finishes in a handful of sweeps.
const MAX_SWEEPS: usize = 24;

/// Convergence threshold on the Frobenius norm of the iterate change.
const SWEEP_TOLERANCE: f32 = 1.0e-6;

/// Result of a 3×3 polar decomposition: F = R·S.
#[derive(Debug, Clone, Copy)]
pub struct PolarDecomposition {
    /// Rotation part (orthogonal).
    pub rotation: Mat3,
    /// Stretch part (symmetric positive semi-definite).
    pub stretch: Mat3,
}

/// Compute the polar decomposition of a 3×3 matrix.
///
/// Uses the Newton iteration `R ← ½(R + R⁻ᵗ)`, seeded with F itself,
/// then recovers the stretch as the symmetrized `RᵀF`.
///
/// For singular input (det(F) ≈ 0) the iteration cannot run; the rotation
/// falls back to identity and the stretch to the symmetric part of F.
/// That is a degeneracy policy, not an error.
pub fn polar_decompose(f: &Mat3) -> PolarDecomposition {
    if f.determinant().abs() < EPSILON {
        return PolarDecomposition {
            rotation: Mat3::IDENTITY,
            stretch: symmetrize(f),
        };
    }

    let mut r = *f;
    for _ in 0..MAX_SWEEPS {
        let next = (r + r.inverse().transpose()) * 0.5;
        let step = next - r;
        r = next;
        if ddot(&step, &step) < SWEEP_TOLERANCE * SWEEP_TOLERANCE {
            break;
        }
    }

    let s = r.transpose() * *f;
    PolarDecomposition {
        rotation: r,
        stretch: symmetrize(&s),
    }
}

#[inline]
fn symmetrize(m: &Mat3) -> Mat3 {
    (*m + m.transpose()) * 0.5
}
