//! Integrate trait and main loop
//!
//! The loop advances a pde until it reports that a stop criterion is met.
//! Whatever ends the loop, regular stop or error, a timing summary is
//! logged afterwards.
use crate::error::Result;
use std::time::Instant;
use tracing::{error, info};

/// Integrate trait, step forward in time
pub trait Integrate {
    /// Advance solution by dt, returns the step taken
    ///
    /// # Errors
    /// Failure of the underlying solver.
    fn update(&mut self, dt: f64) -> Result<f64>;
    /// False once a stop criterion is met
    fn proceed(&self) -> bool;
    /// Receive current time
    fn get_time(&self) -> f64;
    /// Get last timestep
    fn get_dt(&self) -> f64;
    /// Current iteration
    fn get_iteration(&self) -> usize;
}

/// Timing summary of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    /// Iteration at the end of the run
    pub iterations: usize,
    /// Simulation time at the end of the run
    pub sim_time: f64,
    /// Wall clock seconds spent in the loop
    pub run_time: f64,
    /// run_time / 3600 * workers
    pub cpu_hours: f64,
}

/// Integrate pde, that implements the Integrate trait.
///
/// # Arguments
/// * `pde` - Solver
/// * `compute_dt` - Step size for the next update (e.g. CFL)
/// * `callback` - Called after every update with the step taken
/// * `workers` - Number of workers, used for the cpu-hours
///
/// Stop Criteria: whatever [`Integrate::proceed`] decides.
///
/// # Errors
/// The first error of `compute_dt`, `update` or `callback` ends the loop
/// and is returned, after the timing summary was logged.
pub fn integrate<T, D, C>(
    pde: &mut T,
    mut compute_dt: D,
    mut callback: C,
    workers: usize,
) -> Result<RunStats>
where
    T: Integrate,
    D: FnMut(&T) -> Result<f64>,
    C: FnMut(&T, f64) -> Result<()>,
{
    info!("Starting loop");
    let start_time = Instant::now();
    let result = main_loop(pde, &mut compute_dt, &mut callback);
    if let Err(e) = &result {
        error!("Exception raised, triggering end of main loop.");
        error!("{}", e);
    }
    let run_time = start_time.elapsed().as_secs_f64();
    let stats = RunStats {
        iterations: pde.get_iteration(),
        sim_time: pde.get_time(),
        run_time,
        cpu_hours: run_time / 3600. * workers as f64,
    };
    info!("Iterations: {}", stats.iterations);
    info!("Sim end time: {:.6}", stats.sim_time);
    info!("Run time: {:.2} sec", stats.run_time);
    info!("Run time: {:.6} cpu-hr", stats.cpu_hours);
    result.map(|_| stats)
}

fn main_loop<T, D, C>(pde: &mut T, compute_dt: &mut D, callback: &mut C) -> Result<()>
where
    T: Integrate,
    D: FnMut(&T) -> Result<f64>,
    C: FnMut(&T, f64) -> Result<()>,
{
    while pde.proceed() {
        let dt = compute_dt(pde)?;
        let dt = pde.update(dt)?;
        callback(pde, dt)?;
    }
    Ok(())
}
