//! # Quickstart experiment
//!
//! Builds the Boussinesq problem, starts from a random perturbation or
//! resumes from a checkpoint, registers snapshots, CFL and the Reynolds
//! number diagnostic, and runs the main loop.
//!
//! A fresh start runs until `stop_sim_time` and overwrites earlier snapshots.
//! If the checkpoint (`restart.h5`) exists in the working directory, its last
//! write is loaded, the run continues with the stored time step until
//! `restart_stop_sim_time` and snapshots are appended.
use crate::config::Config;
use crate::error::Result;
use crate::evaluator::FileMode;
use crate::flow_tools::{Cfl, GlobalFlowProperty};
use crate::integrate::{integrate, Integrate, RunStats};
use crate::navier::Variable;
use crate::problem::Boussinesq2D;
use std::path::Path;
use tracing::info;

/// Fresh start or restart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartPlan {
    /// Initial time step
    pub dt: f64,
    /// Simulation stop time
    pub stop_sim_time: f64,
    /// Treatment of earlier snapshot sets
    pub mode: FileMode,
}

impl StartPlan {
    /// Plan of a run, the time step of a restart is replaced by the
    /// loaded one, see [`StartPlan::with_dt`]
    pub fn new(config: &Config, restart_exists: bool) -> Self {
        if restart_exists {
            Self {
                dt: config.run.initial_dt,
                stop_sim_time: config.run.restart_stop_sim_time,
                mode: FileMode::Append,
            }
        } else {
            Self {
                dt: config.run.initial_dt,
                stop_sim_time: config.run.stop_sim_time,
                mode: FileMode::Overwrite,
            }
        }
    }

    /// Same plan with another initial step
    pub fn with_dt(self, dt: f64) -> Self {
        Self { dt, ..self }
    }

    /// True for a restart
    pub fn is_restart(&self) -> bool {
        self.mode == FileMode::Append
    }
}

/// Run experiment inside `workdir`
///
/// # Errors
/// Setup errors (checkpoint, output directory) and any error ending the
/// main loop.
pub fn run(config: &Config, workdir: &Path) -> Result<RunStats> {
    let problem = Boussinesq2D::from_config(config)?;
    let mut solver = problem.build_solver(config.timestepping.scheme)?;
    info!("Solver built");

    // Initial conditions or restart
    let restart_file = workdir.join(&config.run.restart_file);
    let mut plan = StartPlan::new(config, restart_file.exists());
    if plan.is_restart() {
        let (_write, last_dt) = solver.load_state(&restart_file, -1)?;
        plan = plan.with_dt(last_dt);
    } else {
        solver.random_perturbation(config.init.seed, config.init.amplitude)?;
    }

    // Integration parameters
    solver.stop_sim_time = plan.stop_sim_time;
    if let Some(wall_time) = config.run.stop_wall_time {
        solver.stop_wall_time = wall_time;
    }
    if let Some(iteration) = config.run.stop_iteration {
        solver.stop_iteration = iteration;
    }

    // Analysis
    solver
        .add_file_handler(
            workdir,
            &config.output.name,
            config.output.max_writes,
            plan.mode,
        )?
        .set_sim_dt(config.output.sim_dt)
        .add_system();

    // CFL
    let mut cfl = Cfl::from_config(&mut solver, plan.dt, &config.cfl);
    cfl.add_velocities(&mut solver, [Variable::U, Variable::W]);

    // Flow properties
    let mut flow = GlobalFlowProperty::new(&mut solver, config.flow.cadence.max(1));
    let r = solver.params().viscosity;
    flow.add_property(&mut solver, "Re", move |g| {
        (&g.u * &g.u + &g.w * &g.w).mapv(f64::sqrt) / r
    });

    let log_cadence = config.run.log_cadence.max(1);
    let workers = rayon::current_num_threads();
    integrate(
        &mut solver,
        |s| cfl.compute_dt(s),
        |s, dt| {
            if (s.get_iteration() - 1) % log_cadence == 0 {
                info!(
                    "Iteration: {}, Time: {:e}, dt: {:e}",
                    s.get_iteration(),
                    s.get_time(),
                    dt
                );
                info!("Max Re = {:.6}", flow.max("Re")?);
            }
            Ok(())
        },
        workers,
    )
}
