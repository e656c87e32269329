//! The conjugate-residual driver for the implicit velocity update.

use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use firn_telemetry::{EventBus, EventKind, SolverEvent};
use firn_types::{FirnError, FirnResult};

use crate::cache::{Field, NodeScratch, ParticleScratch, WeightCache};
use crate::config::SolverConfig;
use crate::grid::{Grid, GridNode};
use crate::operator::{apply_operator, compute_trial_state};
use crate::particle::Particle;
use crate::reduction::{fold_scratch, inner_product};

/// Outcome of one implicit solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// Iterations actually run.
    pub iterations: u32,
    /// Squared residual ⟨r, r⟩ at termination.
    pub final_residual: f64,
    /// Whether the residual dropped below the configured threshold.
    pub converged: bool,
    /// Wall-clock seconds spent in `solve`.
    pub wall_time: f64,
}

/// Matrix-free conjugate-residual solver for end-of-step grid velocities.
///
/// Owns its scratch buffers and reuses them across steps; buffers are
/// resized and zeroed at the start of every solve, so nothing leaks from
/// one step into the next. One solve may be in flight at a time.
pub struct ImplicitSolver {
    config: SolverConfig,
    pscratch: Vec<ParticleScratch>,
    nscratch: NodeScratch,
    telemetry: Option<EventBus>,
    step: u32,
}

impl ImplicitSolver {
    /// Build a solver, rejecting invalid configurations up front.
    pub fn new(config: SolverConfig) -> FirnResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            pscratch: Vec::new(),
            nscratch: NodeScratch::new(0),
            telemetry: None,
            step: 0,
        })
    }

    /// Route per-iteration events through `bus`.
    pub fn attach_telemetry(&mut self, bus: EventBus) {
        self.telemetry = Some(bus);
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn emit(&self, kind: EventKind) {
        if let Some(bus) = &self.telemetry {
            bus.emit(SolverEvent::new(self.step, kind));
        }
    }

    /// Solve `Eu(v) = v⁰` and write the result back into `nodes`.
    ///
    /// On entry each node carries its pre-solve velocity in both
    /// `velocity` and `velocity_change`; on exit `velocity` holds the
    /// solved velocity and `velocity_change` the (post − pre) delta.
    /// Particles and weights are read-only throughout.
    pub fn solve(
        &mut self,
        grid: &Grid,
        particles: &[Particle],
        nodes: &mut [GridNode],
        weights: &WeightCache,
        dt: f32,
    ) -> FirnResult<StepResult> {
        let start = Instant::now();

        grid.validate()?;
        if nodes.len() != grid.node_count() {
            return Err(FirnError::MismatchedBuffers(format!(
                "grid has {} nodes but {} were supplied",
                grid.node_count(),
                nodes.len()
            )));
        }
        if weights.len() != particles.len() {
            return Err(FirnError::MismatchedBuffers(format!(
                "{} particles but {} weight rows",
                particles.len(),
                weights.len()
            )));
        }
        weights.validate(nodes.len())?;
        if !(dt > 0.0) {
            return Err(FirnError::InvalidConfig(format!(
                "time step must be positive, got {dt}"
            )));
        }

        self.pscratch.clear();
        self.pscratch
            .resize(particles.len(), ParticleScratch::default());
        self.nscratch.reset(nodes.len());

        self.emit(EventKind::StepBegin { dt });

        let blend = self.config.implicit_blend;
        compute_trial_state(particles, nodes, weights, &mut self.pscratch, dt);

        // Initialization: v = v⁰, r = v⁰ − Eu(v), p = r, Ar = Eu(r), Ap = Ar.
        self.nscratch
            .fields
            .par_iter_mut()
            .zip(nodes.par_iter())
            .for_each(|(f, node)| f.v = node.velocity);
        apply_operator(
            particles,
            nodes,
            weights,
            &mut self.pscratch,
            &mut self.nscratch,
            Field::V,
            Field::R,
            dt,
            blend,
        );
        self.nscratch.fields.par_iter_mut().for_each(|f| {
            f.r = f.v - f.r;
            f.p = f.r;
        });
        apply_operator(
            particles,
            nodes,
            weights,
            &mut self.pscratch,
            &mut self.nscratch,
            Field::R,
            Field::Ar,
            dt,
            blend,
        );
        self.nscratch
            .fields
            .par_iter_mut()
            .for_each(|f| f.ap = f.ar);

        let mut iterations = 0u32;
        let mut residual;
        loop {
            // α = ⟨r, Ar⟩ / ⟨Ap, Ap⟩; its numerator is also next β's
            // denominator, so it is captured before r changes.
            let alpha_num = inner_product(&mut self.nscratch, Field::R, Field::Ar);
            let alpha_den = inner_product(&mut self.nscratch, Field::Ap, Field::Ap);
            let alpha = if alpha_den.abs() > 0.0 {
                alpha_num / alpha_den
            } else {
                0.0
            };
            let beta_den = alpha_num;

            let alpha_f = alpha as f32;
            self.nscratch.fields.par_iter_mut().for_each(|f| {
                f.v += alpha_f * f.p;
                f.r -= alpha_f * f.ap;
            });

            apply_operator(
                particles,
                nodes,
                weights,
                &mut self.pscratch,
                &mut self.nscratch,
                Field::R,
                Field::Ar,
                dt,
                blend,
            );

            let beta_num = inner_product(&mut self.nscratch, Field::R, Field::Ar);
            let beta = if beta_den.abs() > 0.0 {
                beta_num / beta_den
            } else {
                0.0
            };

            // Direction recurrence fused with the residual-norm pass.
            let beta_f = beta as f32;
            {
                let NodeScratch {
                    fields, scratch, ..
                } = &mut self.nscratch;
                fields
                    .par_iter_mut()
                    .zip(scratch.par_iter_mut())
                    .for_each(|(f, slot)| {
                        f.p = f.r + beta_f * f.p;
                        f.ap = f.ar + beta_f * f.ap;
                        *slot = f.r.dot(f.r) as f64;
                    });
            }
            residual = fold_scratch(&mut self.nscratch.scratch);

            iterations += 1;
            debug!(
                iteration = iterations,
                r_ar = alpha_num,
                alpha,
                beta,
                residual,
                "conjugate residual iteration"
            );
            self.emit(EventKind::SolverIteration {
                iteration: iterations,
                r_ar: alpha_num,
                alpha,
                beta,
                residual,
            });

            if iterations >= self.config.max_iterations
                || residual <= self.config.residual_threshold
            {
                break;
            }
        }

        let converged = residual <= self.config.residual_threshold;
        {
            let fields = &self.nscratch.fields;
            nodes
                .par_iter_mut()
                .zip(fields.par_iter())
                .for_each(|(node, f)| {
                    node.velocity = f.v;
                    node.velocity_change = node.velocity - node.velocity_change;
                });
        }

        self.emit(EventKind::Convergence {
            iterations,
            final_residual: residual,
            converged,
        });
        if let Some(bus) = &mut self.telemetry {
            bus.flush();
        }
        self.step += 1;

        Ok(StepResult {
            iterations,
            final_residual: residual,
            converged,
            wall_time: start.elapsed().as_secs_f64(),
        })
    }
}
