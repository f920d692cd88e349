//! # Evaluation of output and diagnostics during a run
//!
//! Handlers are checked before every time step. A handler that is due
//! receives the grid data of the current state:
//! - [`FileHandler`] appends snapshots to hdf5 files
//! - [`DictionaryHandler`] keeps the latest values of derived quantities in
//!   memory, used by [`crate::flow_tools`]
pub mod dictionary;
pub mod file_handler;
pub use dictionary::{DictionaryHandler, Results, TaskFn};
pub use file_handler::{FileHandler, FileMode};

use crate::error::Result;
use crate::navier::Variable;
use ndarray::Array2;

/// Solver clock at the time of an evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    /// Simulation time
    pub sim_time: f64,
    /// Seconds since the solver was built
    pub wall_time: f64,
    /// Iteration
    pub iteration: usize,
    /// Size of the upcoming time step
    pub timestep: f64,
}

/// State variables on the grid, shape (nx, nz)
#[derive(Debug, Clone)]
pub struct GridData {
    /// Buoyancy
    pub b: Array2<f64>,
    /// dz(b)
    pub bz: Array2<f64>,
    /// Horizontal velocity
    pub u: Array2<f64>,
    /// dz(u)
    pub uz: Array2<f64>,
    /// Vertical velocity
    pub w: Array2<f64>,
    /// dz(w)
    pub wz: Array2<f64>,
}

impl GridData {
    /// Grid values of variable
    pub fn get(&self, variable: Variable) -> &Array2<f64> {
        match variable {
            Variable::B => &self.b,
            Variable::Bz => &self.bz,
            Variable::U => &self.u,
            Variable::Uz => &self.uz,
            Variable::W => &self.w,
            Variable::Wz => &self.wz,
        }
    }
}

/// Identifies a dictionary handler of an [`Evaluator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(pub(crate) usize);

/// Collection of all handlers of a solver
#[derive(Default)]
pub struct Evaluator {
    /// Snapshot writers
    pub file_handlers: Vec<FileHandler>,
    dictionary_handlers: Vec<DictionaryHandler>,
}

impl Evaluator {
    /// Empty evaluator
    pub fn new() -> Self {
        Self::default()
    }

    /// Register file handler, returns it for further setup
    pub fn add_file_handler(&mut self, handler: FileHandler) -> &mut FileHandler {
        let idx = self.file_handlers.len();
        self.file_handlers.push(handler);
        &mut self.file_handlers[idx]
    }

    /// Register dictionary handler evaluated every `iter` iterations
    pub fn add_dictionary_handler(&mut self, iter: usize) -> HandlerId {
        self.dictionary_handlers.push(DictionaryHandler::new(iter));
        HandlerId(self.dictionary_handlers.len() - 1)
    }

    /// Dictionary handler
    pub fn dictionary(&self, id: HandlerId) -> &DictionaryHandler {
        &self.dictionary_handlers[id.0]
    }

    /// Mutable dictionary handler
    pub fn dictionary_mut(&mut self, id: HandlerId) -> &mut DictionaryHandler {
        &mut self.dictionary_handlers[id.0]
    }

    /// True if any handler wants to be evaluated
    pub fn is_due(&self, schedule: &Schedule) -> bool {
        self.file_handlers.iter().any(|h| h.is_due(schedule))
            || self.dictionary_handlers.iter().any(|h| h.is_due(schedule))
    }

    /// Evaluate all handlers that are due
    ///
    /// # Errors
    /// Propagates write errors of file handlers.
    pub fn evaluate_scheduled(&mut self, schedule: &Schedule, data: &GridData) -> Result<()> {
        for handler in self.dictionary_handlers.iter_mut() {
            if handler.is_due(schedule) {
                handler.process(schedule, data);
            }
        }
        for handler in self.file_handlers.iter_mut() {
            if handler.is_due(schedule) {
                handler.process(schedule, data)?;
            }
        }
        Ok(())
    }
}

/// floor(value / interval), the counter of a time cadence
pub(crate) fn cadence_div(value: f64, interval: f64) -> i64 {
    (value / interval).floor() as i64
}
