#![warn(missing_docs)]
//! # rbc-quickstart: two-dimensional Rayleigh-Benard convection
//!
//! Spectral simulation of a Boussinesq fluid heated from below, periodic in
//! the horizontal direction (Fourier) and bounded by two plates in the
//! vertical direction (Chebyshev).
//!
//! The crate is organised the way the experiment is set up:
//! - [`bases`], [`domain`] and [`field`] discretize the box
//! - [`problem`] holds the Boussinesq equations and builds a [`navier::Solver`]
//! - [`timestepper`] provides the implicit-explicit Runge-Kutta schemes
//! - [`evaluator`] writes snapshots and evaluates diagnostics during the run
//! - [`flow_tools`] adapts the time step (CFL) and reports flow properties
//! - [`integrate`] drives the main loop and [`experiment`] wires everything
//!   together for the quickstart run
//!
//! # Example
//! ```ignore
//! use rbc_quickstart::{experiment, Config};
//! let config = Config::default();
//! let stats = experiment::run(&config, std::path::Path::new(".")).unwrap();
//! println!("{} iterations", stats.iterations);
//! ```
pub mod bases;
pub mod config;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod experiment;
pub mod field;
pub mod flow_tools;
pub mod hdf5;
pub mod integrate;
pub mod navier;
pub mod problem;
pub mod solver;
pub mod timestepper;

pub use bases::{Base, BaseBasics, Chebyshev, Fourier};
pub use config::Config;
pub use domain::Domain;
pub use error::{Error, Result};
pub use field::Field2;
pub use integrate::{integrate, Integrate, RunStats};
pub use navier::{Solver, Variable};
pub use problem::Boussinesq2D;
pub use timestepper::Timestepper;

/// Real type
pub type Real = f64;
