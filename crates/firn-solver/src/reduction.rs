//! Grid-wide inner products in `f64`.
//!
//! Node state is `f32` but the conjugate-residual scalars are accumulated
//! in `f64`: α and β are ratios of near-cancelling sums, and single
//! precision drift there stalls convergence long before the 1e-6 residual
//! threshold. The fold is a binary tree so the rounding error grows with
//! log₂(n) rather than n.

use rayon::prelude::*;

use crate::cache::{Field, NodeScratch};

/// ⟨a, b⟩ over all nodes, widened to `f64` before any summation.
pub fn inner_product(nscratch: &mut NodeScratch, a: Field, b: Field) -> f64 {
    let NodeScratch {
        fields, scratch, ..
    } = nscratch;
    scratch
        .par_iter_mut()
        .zip(fields.par_iter())
        .for_each(|(slot, f)| {
            *slot = f[a].dot(f[b]) as f64;
        });
    fold_scratch(scratch)
}

/// Tree-fold `scratch` into `scratch[0]` and return it.
///
/// Each level pairs element `i` with element `i + stride` starting from
/// the largest power-of-two stride below `n`, so every element is folded
/// in exactly once regardless of whether `n` is a power of two. The
/// `split_at_mut` keeps the read half and the write half disjoint, which
/// is what lets the level run as one parallel pass. Destroys the scratch
/// contents.
pub fn fold_scratch(scratch: &mut [f64]) -> f64 {
    let n = scratch.len();
    if n == 0 {
        return 0.0;
    }
    let mut stride = n.next_power_of_two() / 2;
    while stride >= 1 {
        let (lo, hi) = scratch.split_at_mut(stride);
        lo.par_iter_mut()
            .zip(hi.par_iter())
            .for_each(|(acc, tail)| *acc += *tail);
        stride /= 2;
    }
    scratch[0]
}
