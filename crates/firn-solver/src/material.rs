//! Snow material parameters.
//!
//! The snow model scales its Lamé coefficients by an exponential of the
//! plastic compression: packed snow stiffens, fluffed snow softens. The
//! solver only ever needs the hardened pair, never the raw stress.

use serde::{Deserialize, Serialize};

use firn_types::constants::{SNOW_HARDENING, SNOW_POISSONS_RATIO, SNOW_YOUNGS_MODULUS};
use firn_types::Scalar;

/// Elastoplastic material parameters for one particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// First Lamé coefficient μ₀ (shear resistance) at zero plastic strain.
    pub mu: Scalar,
    /// Second Lamé coefficient λ₀ at zero plastic strain.
    pub lambda: Scalar,
    /// Plastic hardening exponent ξ.
    pub xi: Scalar,
}

impl Material {
    /// Lamé coefficients from Young's modulus and Poisson's ratio.
    pub fn from_youngs_poisson(e: Scalar, nu: Scalar, xi: Scalar) -> Self {
        Self {
            mu: e / (2.0 * (1.0 + nu)),
            lambda: e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu)),
            xi,
        }
    }

    /// The fresh-snow defaults (E₀ = 1.4e5 Pa, ν = 0.2, ξ = 10).
    pub fn snow() -> Self {
        Self::from_youngs_poisson(SNOW_YOUNGS_MODULUS, SNOW_POISSONS_RATIO, SNOW_HARDENING)
    }

    /// Hardening-scaled Lamé coefficients (μ(Fᵖ), λ(Fᵖ)) for the plastic
    /// volume ratio `jp = det Fᵖ`:
    ///
    /// ```text
    /// μ(Fᵖ) = μ₀·exp(ξ(1 − Jᵖ)),   λ(Fᵖ) = λ₀·exp(ξ(1 − Jᵖ))
    /// ```
    #[inline]
    pub fn hardened(&self, jp: Scalar) -> (Scalar, Scalar) {
        let h = (self.xi * (1.0 - jp)).exp();
        (self.mu * h, self.lambda * h)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::snow()
    }
}
