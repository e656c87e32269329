//! # firn-solver
//!
//! The implicit velocity update at the heart of the Firn snow simulator:
//! a matrix-free conjugate-residual solve for end-of-step grid velocities,
//! coupling the elastoplastic snow stress response to velocity change.
//!
//! ## Key Types
//!
//! - [`Particle`] / [`GridNode`] / [`Grid`] — the simulation data model
//! - [`WeightCache`] — precomputed particle↔node interpolation weights
//! - [`SolverConfig`] — tunables (implicit blend, iteration budget, threshold)
//! - [`ImplicitSolver`] — the conjugate-residual driver
//!
//! The solver reads particles, mutates grid nodes, and owns its scratch
//! buffers; all scratch is reinitialized per solve, so one solve may be in
//! flight at a time.

pub mod cache;
pub mod config;
pub mod grid;
pub mod implicit;
pub mod material;
pub mod operator;
pub mod particle;
pub mod reduction;

pub use cache::{Field, NodeScratch, NodeWeight, ParticleScratch, WeightCache};
pub use config::SolverConfig;
pub use grid::{Grid, GridNode};
pub use implicit::{ImplicitSolver, StepResult};
pub use material::Material;
pub use particle::Particle;
