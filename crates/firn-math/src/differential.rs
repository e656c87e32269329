//! Closed-form differentials for linearizing the snow stress response.
//!
//! Both functions are exact derivatives, not finite-difference
//! approximations. They are evaluated once per particle per operator
//! application, so they stay allocation-free and branch-light.

use glam::{Mat3, Vec3};

use firn_types::constants::EPSILON;

/// Differential dR of the rotation factor of a polar decomposition.
///
/// Given F = R·S with R orthogonal and S symmetric, a perturbation dF of F
/// perturbs the rotation by dR = R·W, where W = RᵀdR is skew-symmetric.
/// Skewness leaves three unknowns, which satisfy the linear system obtained
/// from the symmetry constraint on d(RᵀF):
///
/// ```text
/// [ S₀₀+S₁₁   S₁₂    −S₀₂ ] [w₀]   [ V₀₁ ]
/// [  S₁₂    S₀₀+S₂₂   S₀₁ ] [w₁] = [ V₀₂ ] ,  V = RᵀdF − dFᵀR
/// [ −S₀₂     S₀₁    S₁₁+S₂₂] [w₂]   [ V₁₂ ]
/// ```
///
/// Returns the zero matrix when the system is singular (degenerate
/// stretch), so a collapsed particle contributes no rotational response.
pub fn rotation_differential(re: &Mat3, se: &Mat3, df: &Mat3) -> Mat3 {
    let v = re.transpose() * *df - df.transpose() * *re;

    let s00 = se.x_axis.x;
    let s11 = se.y_axis.y;
    let s22 = se.z_axis.z;
    let s01 = se.y_axis.x;
    let s02 = se.z_axis.x;
    let s12 = se.z_axis.y;

    let a = Mat3::from_cols(
        Vec3::new(s00 + s11, s12, -s02),
        Vec3::new(s12, s00 + s22, s01),
        Vec3::new(-s02, s01, s11 + s22),
    );
    if a.determinant().abs() < EPSILON {
        return Mat3::ZERO;
    }

    let b = Vec3::new(v.y_axis.x, v.z_axis.x, v.z_axis.y);
    let w = a.inverse() * b;

    // W = RᵀdR, skew-symmetric from the three solved components.
    let rt_dr = Mat3::from_cols(
        Vec3::new(0.0, -w.x, -w.y),
        Vec3::new(w.x, 0.0, -w.z),
        Vec3::new(w.y, w.z, 0.0),
    );
    *re * rt_dr
}

/// Differential of the cofactor matrix J·F⁻ᵗ under a perturbation dF.
///
/// The cofactor is quadratic in the entries of F, so its derivative is the
/// fixed bilinear form below: nine expressions, each mixing one entry of F
/// with one of dF. Indices are column-major (`m[col*3 + row]`).
pub fn cofactor_differential(f: &Mat3, df: &Mat3) -> Mat3 {
    let f = f.to_cols_array();
    let d = df.to_cols_array();
    Mat3::from_cols_array(&[
        f[4] * d[8] - f[5] * d[7] - f[7] * d[5] + f[8] * d[4],
        f[5] * d[6] - f[3] * d[8] + f[6] * d[5] - f[8] * d[3],
        f[3] * d[7] - f[4] * d[6] - f[6] * d[4] + f[7] * d[3],
        f[2] * d[7] - f[1] * d[8] + f[7] * d[2] - f[8] * d[1],
        f[0] * d[8] - f[2] * d[6] - f[6] * d[2] + f[8] * d[0],
        f[1] * d[6] - f[0] * d[7] + f[6] * d[1] - f[7] * d[0],
        f[1] * d[5] - f[2] * d[4] - f[4] * d[2] + f[5] * d[1],
        f[2] * d[3] - f[0] * d[5] + f[3] * d[2] - f[5] * d[0],
        f[0] * d[4] - f[1] * d[3] - f[3] * d[1] + f[4] * d[0],
    ])
}
