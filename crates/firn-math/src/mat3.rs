//! 3×3 matrix helpers used by the constitutive model.

use glam::{Mat3, Vec3};

/// Outer product a·bᵀ, i.e. `M[i][j] = a[i] * b[j]`.
///
/// The deformation-gradient differential is assembled from outer products
/// of node velocities with interpolation weight gradients.
#[inline]
pub fn outer_product(a: Vec3, b: Vec3) -> Mat3 {
    Mat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// Matrix double contraction Σᵢⱼ AᵢⱼBᵢⱼ = trace(AᵀB).
#[inline]
pub fn ddot(a: &Mat3, b: &Mat3) -> f32 {
    a.x_axis.dot(b.x_axis) + a.y_axis.dot(b.y_axis) + a.z_axis.dot(b.z_axis)
}

/// Cofactor matrix J·F⁻ᵗ, built from column cross products.
///
/// Equals `det(F) · F⁻ᵗ` for invertible F but stays well-defined for
/// singular input, which matters for fully-compressed particles.
#[inline]
pub fn cofactor(f: &Mat3) -> Mat3 {
    Mat3::from_cols(
        f.y_axis.cross(f.z_axis),
        f.z_axis.cross(f.x_axis),
        f.x_axis.cross(f.y_axis),
    )
}
