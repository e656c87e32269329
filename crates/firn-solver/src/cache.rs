//! Per-solve caches: interpolation weights, particle scratch, node scratch.
//!
//! The weight cache is built by the (external) grid setup stage and consumed
//! read-only here. Both scratch structures are recomputed from nothing at
//! the start of every solve; nothing in them survives across steps.

use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Mat3, Vec3};

use firn_types::constants::{NEIGHBOR_SLOTS, NO_NODE};
use firn_types::{FirnError, FirnResult};

/// One weight-cache slot: a grid node whose interpolation support covers
/// the particle, with the weight gradient ∇w evaluated at the particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeWeight {
    /// Node index, or [`NO_NODE`] for an unused slot.
    pub node: i32,
    /// Interpolation weight gradient.
    pub wg: Vec3,
}

impl Default for NodeWeight {
    fn default() -> Self {
        Self {
            node: NO_NODE,
            wg: Vec3::ZERO,
        }
    }
}

/// Per-particle rows of [`NEIGHBOR_SLOTS`] weight-cache slots.
///
/// Rows are fixed-capacity with a sentinel for unused slots rather than
/// variable-length: the scatter and gather loops iterate all 64 slots
/// unconditionally, which keeps parallel dispatch uniform. A node index
/// appears at most once within a row.
pub struct WeightCache {
    rows: Vec<[NodeWeight; NEIGHBOR_SLOTS]>,
}

impl WeightCache {
    /// A cache with every slot unused, one row per particle.
    pub fn new(particle_count: usize) -> Self {
        Self {
            rows: vec![[NodeWeight::default(); NEIGHBOR_SLOTS]; particle_count],
        }
    }

    /// Number of particle rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the cache covers zero particles.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The slot row for one particle.
    #[inline]
    pub fn row(&self, particle: usize) -> &[NodeWeight; NEIGHBOR_SLOTS] {
        &self.rows[particle]
    }

    /// Mutable slot row, for the cache builder and for tests.
    #[inline]
    pub fn row_mut(&mut self, particle: usize) -> &mut [NodeWeight; NEIGHBOR_SLOTS] {
        &mut self.rows[particle]
    }

    /// Boundary contract check: every non-sentinel index names a valid node.
    pub fn validate(&self, node_count: usize) -> FirnResult<()> {
        for (particle, row) in self.rows.iter().enumerate() {
            for slot in row {
                if slot.node != NO_NODE && (slot.node < 0 || slot.node as usize >= node_count) {
                    return Err(FirnError::NodeIndexOutOfRange {
                        particle,
                        index: slot.node,
                        node_count,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Per-particle scratch for one solve.
///
/// `fe_hat`/`re_hat`/`se_hat` are the trial elastic state, computed once
/// per step and held fixed; `d_f` and `ap` are rewritten by every operator
/// application.
#[derive(Debug, Clone, Copy)]
pub struct ParticleScratch {
    /// Differential deformation gradient dF.
    pub d_f: Mat3,
    /// Trial elastic gradient F̂ᵉ = (I + dt·∇v)·Fᵉ.
    pub fe_hat: Mat3,
    /// Rotation factor of F̂ᵉ.
    pub re_hat: Mat3,
    /// Symmetric stretch factor of F̂ᵉ.
    pub se_hat: Mat3,
    /// Force-response differential Ap.
    pub ap: Mat3,
}

impl Default for ParticleScratch {
    fn default() -> Self {
        Self {
            d_f: Mat3::ZERO,
            fe_hat: Mat3::IDENTITY,
            re_hat: Mat3::IDENTITY,
            se_hat: Mat3::IDENTITY,
            ap: Mat3::ZERO,
        }
    }
}

/// Selector for the conjugate-residual vector fields.
///
/// The operator evaluator is invoked with an (input, output) pair of these,
/// which lets one evaluator serve the initial residual, the direction
/// update, and the recurrence without duplicated kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Candidate velocity v.
    V,
    /// Residual r.
    R,
    /// Search direction p.
    P,
    /// Operator applied to the residual, Ar.
    Ar,
    /// Operator applied to the search direction, Ap.
    Ap,
}

/// The five conjugate-residual vector fields for one node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeFields {
    pub v: Vec3,
    pub r: Vec3,
    pub p: Vec3,
    pub ar: Vec3,
    pub ap: Vec3,
}

impl Index<Field> for NodeFields {
    type Output = Vec3;

    #[inline]
    fn index(&self, field: Field) -> &Vec3 {
        match field {
            Field::V => &self.v,
            Field::R => &self.r,
            Field::P => &self.p,
            Field::Ar => &self.ar,
            Field::Ap => &self.ap,
        }
    }
}

impl IndexMut<Field> for NodeFields {
    #[inline]
    fn index_mut(&mut self, field: Field) -> &mut Vec3 {
        match field {
            Field::V => &mut self.v,
            Field::R => &mut self.r,
            Field::P => &mut self.p,
            Field::Ar => &mut self.ar,
            Field::Ap => &mut self.ap,
        }
    }
}

/// A `Vec3` accumulated with atomic f32 adds.
///
/// The scatter stage is the one point of write contention: many particle
/// tasks may target the same node concurrently. Accumulation must be
/// associative and commutative with no lost updates; summation order is
/// deliberately unspecified.
#[derive(Default)]
pub struct AtomicVec3 {
    x: AtomicU32,
    y: AtomicU32,
    z: AtomicU32,
}

impl AtomicVec3 {
    /// Atomically add `v`, one CAS loop per axis.
    #[inline]
    pub fn add(&self, v: Vec3) {
        Self::add_axis(&self.x, v.x);
        Self::add_axis(&self.y, v.y);
        Self::add_axis(&self.z, v.z);
    }

    #[inline]
    fn add_axis(axis: &AtomicU32, v: f32) {
        let mut current = axis.load(Ordering::Relaxed);
        loop {
            let next = (f32::from_bits(current) + v).to_bits();
            match axis.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Read the accumulated value.
    #[inline]
    pub fn load(&self) -> Vec3 {
        Vec3::new(
            f32::from_bits(self.x.load(Ordering::Relaxed)),
            f32::from_bits(self.y.load(Ordering::Relaxed)),
            f32::from_bits(self.z.load(Ordering::Relaxed)),
        )
    }

    /// Overwrite the accumulated value.
    #[inline]
    pub fn store(&self, v: Vec3) {
        self.x.store(v.x.to_bits(), Ordering::Relaxed);
        self.y.store(v.y.to_bits(), Ordering::Relaxed);
        self.z.store(v.z.to_bits(), Ordering::Relaxed);
    }
}

/// Per-node scratch for one solve.
///
/// No external writer may touch this while a solve is running; the
/// conjugate-residual state is only consistent between driver steps.
pub struct NodeScratch {
    /// The CR vector fields, one entry per node.
    pub fields: Vec<NodeFields>,
    /// Accumulated force differential, the atomic target of the scatter.
    pub df: Vec<AtomicVec3>,
    /// `f64` scratch consumed by the reduction engine.
    pub scratch: Vec<f64>,
}

impl NodeScratch {
    /// Zeroed scratch for `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        let mut df = Vec::with_capacity(node_count);
        df.resize_with(node_count, AtomicVec3::default);
        Self {
            fields: vec![NodeFields::default(); node_count],
            df,
            scratch: vec![0.0; node_count],
        }
    }

    /// Number of nodes covered.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when sized for zero nodes.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resize for a new node count and zero every field.
    pub fn reset(&mut self, node_count: usize) {
        self.fields.clear();
        self.fields.resize(node_count, NodeFields::default());
        self.df.clear();
        self.df.resize_with(node_count, AtomicVec3::default);
        self.scratch.clear();
        self.scratch.resize(node_count, 0.0);
    }

    /// Zero the force-differential accumulators before a scatter pass.
    pub fn clear_df(&self) {
        for acc in &self.df {
            acc.store(Vec3::ZERO);
        }
    }
}
