//! # CFL condition
//!
//! The local advective frequency
//! $$
//! f = |u| / \Delta x + |w| / \Delta z
//! $$
//! is evaluated on the grid every `cadence` iterations and the step size
//! follows from its maximum, dt = safety / max(f).
use crate::bases::BaseBasics;
use crate::error::Result;
use crate::evaluator::{GridData, HandlerId, Results};
use crate::navier::{Solver, Variable};
use ndarray::{Array2, Axis};
use tracing::debug;

/// Adaptive time step from the CFL condition
pub struct Cfl {
    stored_dt: f64,
    cadence: usize,
    safety: f64,
    max_dt: f64,
    min_dt: f64,
    max_change: f64,
    min_change: f64,
    threshold: f64,
    handler: HandlerId,
    frequencies: Results,
    n_freq: usize,
}

impl Cfl {
    /// Register CFL on solver.
    ///
    /// # Arguments
    /// * `initial_dt` - Step size until the first update
    /// * `cadence` - Iterations between updates
    /// * `safety` - Courant number
    /// * `max_dt`, `min_dt` - Absolute bounds
    /// * `max_change`, `min_change` - Bounds relative to the current step
    /// * `threshold` - Relative change below which the step is kept
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        solver: &mut Solver,
        initial_dt: f64,
        cadence: usize,
        safety: f64,
        max_dt: Option<f64>,
        min_dt: Option<f64>,
        max_change: f64,
        min_change: f64,
        threshold: f64,
    ) -> Self {
        let cadence = cadence.max(1);
        let handler = solver.evaluator.add_dictionary_handler(cadence);
        let frequencies = solver.evaluator.dictionary(handler).results();
        Self {
            stored_dt: initial_dt,
            cadence,
            safety,
            max_dt: max_dt.unwrap_or(f64::INFINITY),
            min_dt: min_dt.unwrap_or(0.),
            max_change,
            min_change,
            threshold,
            handler,
            frequencies,
            n_freq: 0,
        }
    }

    /// Register CFL with the settings of a [`crate::config::CflConfig`]
    pub fn from_config(solver: &mut Solver, initial_dt: f64, c: &crate::config::CflConfig) -> Self {
        Self::new(
            solver,
            initial_dt,
            c.cadence,
            c.safety,
            c.max_dt,
            c.min_dt,
            c.max_change,
            c.min_change,
            c.threshold,
        )
    }

    /// Add velocity components, (u, w) along (x, z)
    pub fn add_velocities(&mut self, solver: &mut Solver, components: [Variable; 2]) {
        let spacing = solver.domain().bases().map(|base| base.grid_spacing());
        for (axis, (component, dx)) in components.iter().zip(spacing).enumerate() {
            let component = *component;
            let name = format!("f{}", self.n_freq);
            self.n_freq += 1;
            let task = move |g: &GridData| -> Array2<f64> {
                let mut freq = g.get(component).mapv(f64::abs);
                for (mut lane, d) in freq.lanes_mut(Axis(1 - axis)).into_iter().zip(dx.iter()) {
                    lane.mapv_inplace(|v| v / d);
                }
                freq
            };
            solver
                .evaluator
                .dictionary_mut(self.handler)
                .add_task(&name, Box::new(task));
        }
    }

    /// Current step size
    pub fn stored_dt(&self) -> f64 {
        self.stored_dt
    }

    /// Compute time step. A new value is derived when the cadence divides
    /// the previous iteration, i.e. right after the frequencies were
    /// evaluated, otherwise the stored step is returned.
    ///
    /// # Errors
    /// Never fails at the moment, kept for symmetry with other diagnostics.
    pub fn compute_dt(&mut self, solver: &Solver) -> Result<f64> {
        let iteration = solver.iteration;
        if iteration == 0 || (iteration - 1) % self.cadence != 0 {
            return Ok(self.stored_dt);
        }
        let frequencies = self
            .frequencies
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if frequencies.is_empty() {
            return Ok(self.stored_dt);
        }
        let mut total: Option<Array2<f64>> = None;
        for freq in frequencies.values() {
            total = Some(match total {
                Some(t) => t + freq,
                None => freq.to_owned(),
            });
        }
        let max_freq = total.map_or(0., |t| t.iter().fold(0_f64, |m, v| m.max(*v)));
        let dt = self.limit(max_freq);
        if (dt - self.stored_dt).abs() > self.threshold * self.stored_dt {
            debug!("CFL: dt {:e} -> {:e}", self.stored_dt, dt);
            self.stored_dt = dt;
        }
        Ok(self.stored_dt)
    }

    /// Apply safety factor and bounds to max frequency
    fn limit(&self, max_freq: f64) -> f64 {
        let dt = if max_freq == 0. {
            f64::INFINITY
        } else {
            self.safety / max_freq
        };
        let dt = dt.min(self.max_dt).min(self.max_change * self.stored_dt);
        dt.max(self.min_dt).max(self.min_change * self.stored_dt)
    }
}
