//! # Direct numerical simulation
//! Initial value solver of the 2-dimensional Boussinesq equations, see
//! [`crate::problem`].
//!
//! # Example
//! Solve 2-D Rayleigh Benard Convection
//! ```ignore
//! use rbc_quickstart::{Boussinesq2D, Config, Timestepper};
//!
//! let config = Config::default();
//! let problem = Boussinesq2D::from_config(&config).unwrap();
//! let mut solver = problem.build_solver(Timestepper::RK222).unwrap();
//! solver.random_perturbation(42, 1e-3).unwrap();
//! solver.stop_sim_time = 1.;
//! while solver.proceed() {
//!     solver.step(0.01).unwrap();
//! }
//! ```
pub mod conv_term;
#[allow(clippy::module_inception)]
pub mod navier;
pub mod operators;
pub use navier::Solver;
pub use operators::ModeOperator;

/// Output variables of the solver, all in physical space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Buoyancy
    B,
    /// Vertical derivative of buoyancy
    Bz,
    /// Horizontal velocity
    U,
    /// Vertical derivative of u
    Uz,
    /// Vertical velocity
    W,
    /// Vertical derivative of w
    Wz,
}

impl Variable {
    /// The full system
    pub const ALL: [Variable; 6] = [
        Variable::B,
        Variable::Bz,
        Variable::U,
        Variable::Uz,
        Variable::W,
        Variable::Wz,
    ];

    /// Name of the task in output files
    pub fn name(&self) -> &'static str {
        match self {
            Variable::B => "b",
            Variable::Bz => "bz",
            Variable::U => "u",
            Variable::Uz => "uz",
            Variable::W => "w",
            Variable::Wz => "wz",
        }
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
