//! Scalar type alias for vector-field storage.
//!
//! Grid and particle fields are stored in `f32`; only reduction
//! accumulators use `f64` (to control cancellation error when summing
//! across many nodes).

/// The floating-point type used for vector-field storage.
pub type Scalar = f32;
