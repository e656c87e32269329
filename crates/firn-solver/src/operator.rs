//! Matrix-free evaluation of the implicit velocity operator.
//!
//! The linear system solved each step is `Eu(v) = v⁰` with
//!
//! ```text
//! Eu(u) = u − β·dt·M⁻¹·f'(u)
//! ```
//!
//! where `f'(u)` is the directional derivative of the internal elastic
//! force under the velocity perturbation `u`, `M` the diagonal node-mass
//! operator, and `β` the implicit blend factor. The operator is never
//! assembled; each application runs four data-parallel stages, and every
//! `rayon` pass doubles as the synchronization barrier between stages:
//!
//! 1. per particle — differential deformation gradient dF from the input field
//! 2. per particle — stress differential Ap about the fixed trial state
//! 3. per (particle, node) pair — atomic scatter of force differentials
//! 4. per node — combine with mass and blend into the output field

use glam::Mat3;
use rayon::prelude::*;

use firn_math::differential::{cofactor_differential, rotation_differential};
use firn_math::{cofactor, ddot, outer_product, polar_decompose};

use crate::cache::{Field, NodeScratch, ParticleScratch, WeightCache};
use crate::grid::GridNode;
use crate::particle::Particle;

/// Compute the trial elastic state for every particle.
///
/// `F̂ᵉ = (I + dt·∇v)·Fᵉ`, with the velocity gradient gathered from the
/// *pre-solve* node velocities, then polar-factored into `R̂ᵉ`/`Ŝᵉ`.
/// Runs once per step; the operator is linearized about this state and it
/// is never refreshed mid-solve.
pub fn compute_trial_state(
    particles: &[Particle],
    nodes: &[GridNode],
    weights: &WeightCache,
    pscratch: &mut [ParticleScratch],
    dt: f32,
) {
    pscratch
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, scratch)| {
            let mut v_grad = Mat3::ZERO;
            for slot in weights.row(i) {
                if slot.node >= 0 {
                    let node = &nodes[slot.node as usize];
                    v_grad += outer_product(dt * node.velocity, slot.wg);
                }
            }

            let fe_hat = (Mat3::IDENTITY + v_grad) * particles[i].elastic_f;
            let pd = polar_decompose(&fe_hat);
            scratch.fe_hat = fe_hat;
            scratch.re_hat = pd.rotation;
            scratch.se_hat = pd.stretch;
        });
}

/// Apply the operator to `fields[input]`, writing `fields[output]`.
///
/// Linear in the input field for a fixed trial state. The input and output
/// selectors let the conjugate-residual driver reuse one evaluator for the
/// initial residual, the direction update, and the recurrence.
pub fn apply_operator(
    particles: &[Particle],
    nodes: &[GridNode],
    weights: &WeightCache,
    pscratch: &mut [ParticleScratch],
    nscratch: &mut NodeScratch,
    input: Field,
    output: Field,
    dt: f32,
    blend: f32,
) {
    // Stage 1: dF = (Σᵢ outer(dt·u[nodeᵢ], wgᵢ)) · Fᵉ per particle.
    {
        let fields = &nscratch.fields;
        pscratch
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, scratch)| {
                let mut d_f = Mat3::ZERO;
                for slot in weights.row(i) {
                    if slot.node >= 0 {
                        let du = dt * fields[slot.node as usize][input];
                        d_f += outer_product(du, slot.wg);
                    }
                }
                scratch.d_f = d_f * particles[i].elastic_f;
            });
    }

    // Stage 2: stress differential Ap about the trial state.
    pscratch
        .par_iter_mut()
        .zip(particles.par_iter())
        .for_each(|(scratch, particle)| {
            let jp = particle.plastic_f.determinant();
            let je = scratch.fe_hat.determinant();
            let (mu, lambda) = particle.material.hardened(jp);

            let d_r = rotation_differential(&scratch.re_hat, &scratch.se_hat, &scratch.d_f);
            let jf_inv_trans = cofactor(&scratch.fe_hat);
            let d_jf_inv_trans = cofactor_differential(&scratch.fe_hat, &scratch.d_f);

            scratch.ap = (scratch.d_f - d_r) * (2.0 * mu)
                + jf_inv_trans * (lambda * ddot(&jf_inv_trans, &scratch.d_f))
                + d_jf_inv_trans * (lambda * (je - 1.0));
        });

    // Stage 3: scatter df[node] += −V·(Ap·Fᵉᵗ)·wg with atomic accumulation.
    nscratch.clear_df();
    {
        let df = &nscratch.df;
        pscratch
            .par_iter()
            .zip(particles.par_iter())
            .enumerate()
            .for_each(|(i, (scratch, particle))| {
                let response = scratch.ap * particle.elastic_f.transpose() * (-particle.volume);
                for slot in weights.row(i) {
                    if slot.node >= 0 {
                        df[slot.node as usize].add(response * slot.wg);
                    }
                }
            });
    }

    // Stage 4: result = u − β·dt·df/m per node; zero-mass nodes are inert.
    let beta_dt = blend * dt;
    let NodeScratch { fields, df, .. } = nscratch;
    fields
        .par_iter_mut()
        .zip(df.par_iter())
        .zip(nodes.par_iter())
        .for_each(|((node_fields, df), node)| {
            let scale = if node.mass > 0.0 {
                beta_dt / node.mass
            } else {
                0.0
            };
            node_fields[output] = node_fields[input] - df.load() * scale;
        });
}
