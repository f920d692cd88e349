//! Experiment parameters
//!
//! Defaults reproduce the quickstart run: a 4x1 box resolved with 256x64
//! points at Ra = 1e6 and Pr = 1. Any subset of the values can be
//! overridden from a toml file:
//!
//! ```toml
//! [physics]
//! rayleigh = 1e5
//!
//! [run]
//! stop_sim_time = 10.0
//! ```
use crate::error::Result;
use crate::timestepper::Timestepper;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration of one experiment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Box size and resolution
    pub domain: DomainConfig,
    /// Dimensionless numbers
    pub physics: Physics,
    /// Time integration scheme
    pub timestepping: Timestepping,
    /// Run duration and restart
    pub run: RunConfig,
    /// Snapshot output
    pub output: OutputConfig,
    /// Adaptive time step
    pub cfl: CflConfig,
    /// Flow diagnostics logged during the run
    pub flow: FlowConfig,
    /// Initial perturbation of a fresh start
    pub init: InitConfig,
}

impl Config {
    /// Read configuration from toml file, missing keys fall back to defaults
    ///
    /// # Errors
    /// Fails if the file cannot be read or is not valid toml.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a toml string
    ///
    /// # Errors
    /// Fails if the string is not valid toml for [`Config`].
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Box size and resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Horizontal (periodic) length
    pub lx: f64,
    /// Height between the plates
    pub lz: f64,
    /// Grid points along x
    pub nx: usize,
    /// Grid points along z
    pub nz: usize,
    /// Dealias nonlinear terms with the 3/2 rule
    pub dealias: bool,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            lx: 4.,
            lz: 1.,
            nx: 256,
            nz: 64,
            dealias: true,
        }
    }
}

/// Dimensionless numbers of the Boussinesq system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    /// Prandtl number
    pub prandtl: f64,
    /// Rayleigh number
    pub rayleigh: f64,
    /// Strength of the background buoyancy gradient
    pub forcing: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            prandtl: 1.,
            rayleigh: 1e6,
            forcing: 1.,
        }
    }
}

impl Physics {
    /// Buoyancy diffusivity P = (Ra Pr)^(-1/2)
    pub fn diffusivity(&self) -> f64 {
        (self.rayleigh * self.prandtl).powf(-0.5)
    }

    /// Viscosity R = (Ra / Pr)^(-1/2)
    pub fn viscosity(&self) -> f64 {
        (self.rayleigh / self.prandtl).powf(-0.5)
    }
}

/// Time integration scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timestepping {
    /// IMEX Runge-Kutta tableau
    pub scheme: Timestepper,
}

impl Default for Timestepping {
    fn default() -> Self {
        Self {
            scheme: Timestepper::RK222,
        }
    }
}

/// Run duration for fresh starts and restarts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Checkpoint to resume from, relative to the working directory
    pub restart_file: PathBuf,
    /// Initial time step of a fresh start
    pub initial_dt: f64,
    /// Simulation stop time of a fresh start
    pub stop_sim_time: f64,
    /// Simulation stop time of a restarted run
    pub restart_stop_sim_time: f64,
    /// Wall clock limit in seconds
    pub stop_wall_time: Option<f64>,
    /// Iteration limit
    pub stop_iteration: Option<usize>,
    /// Log progress every n iterations
    pub log_cadence: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            restart_file: PathBuf::from("restart.h5"),
            initial_dt: 0.125,
            stop_sim_time: 25.,
            restart_stop_sim_time: 50.,
            stop_wall_time: None,
            stop_iteration: None,
            log_cadence: 10,
        }
    }
}

/// Snapshot output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Name of the snapshot handler, also its directory
    pub name: String,
    /// Simulation time between writes
    pub sim_dt: f64,
    /// Writes per file before a new set is started
    pub max_writes: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            name: "snapshots".to_string(),
            sim_dt: 0.25,
            max_writes: 50,
        }
    }
}

/// Adaptive time step control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CflConfig {
    /// Iterations between updates
    pub cadence: usize,
    /// Multiplier of the CFL limit
    pub safety: f64,
    /// Largest allowed step
    pub max_dt: Option<f64>,
    /// Smallest allowed step
    pub min_dt: Option<f64>,
    /// Largest growth factor per update
    pub max_change: f64,
    /// Largest shrink factor per update
    pub min_change: f64,
    /// Relative change below which the step is kept
    pub threshold: f64,
}

impl Default for CflConfig {
    fn default() -> Self {
        Self {
            cadence: 10,
            safety: 1.,
            max_dt: Some(0.125),
            min_dt: None,
            max_change: 1.5,
            min_change: 0.5,
            threshold: 0.05,
        }
    }
}

/// Flow diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Iterations between evaluations of the flow properties
    pub cadence: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self { cadence: 10 }
    }
}

/// Random buoyancy perturbation of a fresh start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitConfig {
    /// Seed of the global noise field
    pub seed: u64,
    /// Noise amplitude
    pub amplitude: f64,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            amplitude: 1e-3,
        }
    }
}
