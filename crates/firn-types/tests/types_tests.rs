//! Integration tests for firn-types.

use firn_types::constants::{
    DEFAULT_IMPLICIT_BLEND, DEFAULT_MAX_ITERATIONS, DEFAULT_RESIDUAL_THRESHOLD, NEIGHBOR_SLOTS,
    NO_NODE, SNOW_POISSONS_RATIO, SNOW_YOUNGS_MODULUS,
};
use firn_types::{FirnError, FirnResult};

// ─── Constants Tests ──────────────────────────────────────────

#[test]
fn neighbor_slots_covers_quadratic_support() {
    // 4×4×4 nodes around a particle for quadratic B-spline weights.
    assert_eq!(NEIGHBOR_SLOTS, 64);
}

#[test]
fn sentinel_is_negative() {
    assert!(NO_NODE < 0);
}

#[test]
fn solver_defaults() {
    assert_eq!(DEFAULT_IMPLICIT_BLEND, 0.5);
    assert_eq!(DEFAULT_MAX_ITERATIONS, 15);
    assert_eq!(DEFAULT_RESIDUAL_THRESHOLD, 1.0e-6);
}

#[test]
fn snow_defaults_physical() {
    assert!(SNOW_YOUNGS_MODULUS > 0.0);
    assert!(SNOW_POISSONS_RATIO > 0.0 && SNOW_POISSONS_RATIO < 0.5);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_messages_name_the_offender() {
    let err = FirnError::NodeIndexOutOfRange {
        particle: 7,
        index: 99,
        node_count: 64,
    };
    let msg = err.to_string();
    assert!(msg.contains('7'));
    assert!(msg.contains("99"));
    assert!(msg.contains("64"));
}

#[test]
fn error_propagates_through_result() {
    fn fails() -> FirnResult<()> {
        Err(FirnError::InvalidGrid("test".into()))
    }
    assert!(fails().is_err());
}
