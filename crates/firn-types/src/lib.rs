//! # firn-types
//!
//! Shared types, error definitions, and physical constants for the
//! Firn snow simulation engine.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other Firn crates share.

pub mod constants;
pub mod error;
pub mod scalar;

pub use error::{FirnError, FirnResult};
pub use scalar::Scalar;
