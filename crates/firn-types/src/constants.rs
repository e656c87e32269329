//! Physical constants and solver defaults.

/// Weight-cache slots per particle. The interpolation kernel's support
/// covers at most 4×4×4 grid nodes; the fixed slot count keeps scatter
/// and gather loops uniform for parallel dispatch.
pub const NEIGHBOR_SLOTS: usize = 64;

/// Sentinel node index marking an unused weight-cache slot.
pub const NO_NODE: i32 = -1;

/// Default implicit blend factor β. 0 is fully explicit, 1 fully implicit.
pub const DEFAULT_IMPLICIT_BLEND: f32 = 0.5;

/// Default iteration budget for the conjugate-residual loop.
pub const DEFAULT_MAX_ITERATIONS: u32 = 15;

/// Default early-exit threshold on the squared residual norm Σ‖r‖².
pub const DEFAULT_RESIDUAL_THRESHOLD: f64 = 1e-6;

/// Young's modulus E₀ of fresh snow (Pa).
pub const SNOW_YOUNGS_MODULUS: f32 = 1.4e5;

/// Poisson's ratio ν of fresh snow.
pub const SNOW_POISSONS_RATIO: f32 = 0.2;

/// Plastic hardening exponent ξ of the snow model.
pub const SNOW_HARDENING: f32 = 10.0;

/// Epsilon for floating-point comparisons.
pub const EPSILON: f32 = 1.0e-7;
