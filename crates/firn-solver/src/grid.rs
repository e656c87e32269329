//! Background grid description and per-node state.

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

use firn_types::{FirnError, FirnResult, Scalar};

/// Uniform background grid for one simulation step.
///
/// The solver itself only consumes the node count; the dimensions and
/// cell size exist so callers and the weight-cache builder agree on the
/// node indexing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Cell counts along each axis.
    pub dims: UVec3,
    /// Cell edge length.
    pub cell_size: Scalar,
    /// World position of the grid origin.
    pub origin: Vec3,
}

impl Grid {
    /// Number of grid nodes (cell corners): (nx+1)(ny+1)(nz+1).
    pub fn node_count(&self) -> usize {
        ((self.dims.x + 1) * (self.dims.y + 1) * (self.dims.z + 1)) as usize
    }

    /// Boundary contract check: non-degenerate extent and cell size.
    pub fn validate(&self) -> FirnResult<()> {
        if self.dims.x == 0 || self.dims.y == 0 || self.dims.z == 0 {
            return Err(FirnError::InvalidGrid(format!(
                "zero extent: dims = {:?}",
                self.dims
            )));
        }
        if !(self.cell_size > 0.0) {
            return Err(FirnError::InvalidGrid(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }
}

/// One grid node's state for a single time step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridNode {
    /// Mass rasterized from nearby particles. Zero-mass nodes are inert:
    /// the operator passes them through unchanged.
    pub mass: Scalar,
    /// Node velocity. Pre-solve value on entry; the solved velocity on exit.
    pub velocity: Vec3,
    /// Before/after convention: holds the pre-solve velocity on entry, and
    /// the (post − pre) delta after the solve finishes.
    pub velocity_change: Vec3,
}
