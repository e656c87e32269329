//! Integration tests for firn-math.

use firn_math::differential::{cofactor_differential, rotation_differential};
use firn_math::{cofactor, ddot, outer_product, polar_decompose, Mat3, Vec3};

fn mat3_close(a: &Mat3, b: &Mat3, tol: f32) -> bool {
    ddot(&(*a - *b), &(*a - *b)).sqrt() < tol
}

fn rotation_z(angle: f32) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::from_cols(
        Vec3::new(c, s, 0.0),
        Vec3::new(-s, c, 0.0),
        Vec3::Z,
    )
}

// ─── Mat3 Helper Tests ────────────────────────────────────────

#[test]
fn outer_product_basis() {
    let m = outer_product(Vec3::X, Vec3::Y);
    // a·bᵀ with a = e₀, b = e₁ puts a 1 at row 0, column 1.
    assert_eq!(m.y_axis.x, 1.0);
    assert_eq!(ddot(&m, &m), 1.0);
}

#[test]
fn outer_product_general() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(4.0, 5.0, 6.0);
    let m = outer_product(a, b);
    assert_eq!(m.x_axis, a * 4.0);
    assert_eq!(m.z_axis, a * 6.0);
}

#[test]
fn ddot_identity() {
    assert_eq!(ddot(&Mat3::IDENTITY, &Mat3::IDENTITY), 3.0);
}

#[test]
fn cofactor_of_diagonal() {
    let f = Mat3::from_diagonal(Vec3::new(2.0, 3.0, 4.0));
    let c = cofactor(&f);
    // cof(F) = det(F)·F⁻ᵗ.
    let expected = Mat3::from_diagonal(Vec3::new(12.0, 8.0, 6.0));
    assert!(mat3_close(&c, &expected, 1e-6));
}

#[test]
fn cofactor_of_rotation_is_itself() {
    let r = rotation_z(0.7);
    assert!(mat3_close(&cofactor(&r), &r, 1e-5));
}

// ─── Polar Decomposition Tests ────────────────────────────────

#[test]
fn polar_identity() {
    let pd = polar_decompose(&Mat3::IDENTITY);
    assert!(mat3_close(&pd.rotation, &Mat3::IDENTITY, 1e-5));
    assert!(mat3_close(&pd.stretch, &Mat3::IDENTITY, 1e-5));
}

#[test]
fn polar_pure_rotation() {
    let r = rotation_z(0.3);
    let pd = polar_decompose(&r);
    assert!(mat3_close(&pd.rotation, &r, 1e-4));
    assert!(mat3_close(&pd.stretch, &Mat3::IDENTITY, 1e-4));
}

#[test]
fn polar_pure_stretch() {
    let f = Mat3::from_diagonal(Vec3::new(2.0, 0.5, 1.5));
    let pd = polar_decompose(&f);
    assert!(mat3_close(&pd.rotation, &Mat3::IDENTITY, 1e-4));
    assert!(mat3_close(&pd.stretch, &f, 1e-4));
}

#[test]
fn polar_reconstructs_input() {
    let f = rotation_z(0.9) * Mat3::from_diagonal(Vec3::new(1.2, 0.8, 1.1));
    let pd = polar_decompose(&f);
    assert!(mat3_close(&(pd.rotation * pd.stretch), &f, 1e-3));
    // R orthonormal: RᵗR = I.
    let rtr = pd.rotation.transpose() * pd.rotation;
    assert!(mat3_close(&rtr, &Mat3::IDENTITY, 1e-3));
    // S symmetric.
    assert!(mat3_close(&pd.stretch, &pd.stretch.transpose(), 1e-5));
}

#[test]
fn polar_degenerate_does_not_panic() {
    let pd = polar_decompose(&Mat3::ZERO);
    assert!(!pd.rotation.x_axis.x.is_nan());
    assert!(mat3_close(&pd.rotation, &Mat3::IDENTITY, 1e-6));
}

// ─── Rotation Differential Tests ──────────────────────────────

#[test]
fn rotation_differential_at_identity_is_skew_part() {
    // With R = S = I the differential extracts the skew part of dF.
    let df = Mat3::from_cols(
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(4.0, 5.0, 6.0),
        Vec3::new(7.0, 8.0, 9.0),
    );
    let dr = rotation_differential(&Mat3::IDENTITY, &Mat3::IDENTITY, &df);
    let skew = (df - df.transpose()) * 0.5;
    assert!(mat3_close(&dr, &skew, 1e-5));
}

#[test]
fn rotation_differential_of_symmetric_perturbation_is_zero() {
    let df = Mat3::from_cols(
        Vec3::new(1.0, 0.5, 0.2),
        Vec3::new(0.5, 2.0, 0.3),
        Vec3::new(0.2, 0.3, 3.0),
    );
    let dr = rotation_differential(&Mat3::IDENTITY, &Mat3::IDENTITY, &df);
    assert!(mat3_close(&dr, &Mat3::ZERO, 1e-5));
}

#[test]
fn rotation_differential_matches_finite_difference() {
    let f = rotation_z(0.4) * Mat3::from_diagonal(Vec3::new(1.3, 0.9, 1.1));
    let df = Mat3::from_cols(
        Vec3::new(0.2, -0.1, 0.3),
        Vec3::new(0.1, 0.4, -0.2),
        Vec3::new(-0.3, 0.2, 0.1),
    );
    let pd = polar_decompose(&f);
    let dr = rotation_differential(&pd.rotation, &pd.stretch, &df);

    let h = 1e-3;
    let pd_h = polar_decompose(&(f + df * h));
    let fd = (pd_h.rotation - pd.rotation) * (1.0 / h);
    assert!(
        mat3_close(&dr, &fd, 1e-2),
        "analytic {dr:?} vs finite difference {fd:?}"
    );
}

#[test]
fn rotation_differential_singular_system_yields_zero() {
    // S = 0 makes the 3×3 skew system singular; the policy is dR = 0.
    let dr = rotation_differential(&Mat3::IDENTITY, &Mat3::ZERO, &Mat3::IDENTITY);
    assert_eq!(dr, Mat3::ZERO);
}

// ─── Cofactor Differential Tests ──────────────────────────────

#[test]
fn cofactor_differential_at_identity() {
    // d(cof)(I; dF) = tr(dF)·I − dFᵀ.
    let df = Mat3::from_cols(
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(4.0, 5.0, 6.0),
        Vec3::new(7.0, 8.0, 9.0),
    );
    let dc = cofactor_differential(&Mat3::IDENTITY, &df);
    let trace = df.x_axis.x + df.y_axis.y + df.z_axis.z;
    let expected = Mat3::IDENTITY * trace - df.transpose();
    assert!(mat3_close(&dc, &expected, 1e-5));
}

#[test]
fn cofactor_differential_is_bilinear() {
    let f = Mat3::from_cols(
        Vec3::new(1.1, 0.2, -0.1),
        Vec3::new(0.3, 0.9, 0.1),
        Vec3::new(-0.2, 0.1, 1.2),
    );
    let df = Mat3::from_cols(
        Vec3::new(0.4, -0.2, 0.1),
        Vec3::new(0.2, 0.3, -0.1),
        Vec3::new(0.1, 0.2, 0.5),
    );
    let dc = cofactor_differential(&f, &df);
    let dc_scaled = cofactor_differential(&f, &(df * 2.0));
    assert!(mat3_close(&dc_scaled, &(dc * 2.0), 1e-4));
}

#[test]
fn cofactor_differential_matches_finite_difference() {
    let f = Mat3::from_cols(
        Vec3::new(1.1, 0.2, -0.1),
        Vec3::new(0.3, 0.9, 0.1),
        Vec3::new(-0.2, 0.1, 1.2),
    );
    let df = Mat3::from_cols(
        Vec3::new(0.4, -0.2, 0.1),
        Vec3::new(0.2, 0.3, -0.1),
        Vec3::new(0.1, 0.2, 0.5),
    );
    let dc = cofactor_differential(&f, &df);

    let h = 1e-3;
    let fd = (cofactor(&(f + df * h)) - cofactor(&f)) * (1.0 / h);
    assert!(mat3_close(&dc, &fd, 1e-2));
}
