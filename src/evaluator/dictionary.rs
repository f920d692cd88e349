//! In-memory evaluation of derived grid quantities
use super::{GridData, Schedule};
use ndarray::Array2;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Task evaluated on the grid data
pub type TaskFn = Box<dyn Fn(&GridData) -> Array2<f64> + Send + Sync>;

/// Latest values of all tasks of a handler, shared with its readers
pub type Results = Arc<RwLock<HashMap<String, Array2<f64>>>>;

/// Evaluates named tasks every `iter` iterations and keeps the
/// latest values
pub struct DictionaryHandler {
    iter: usize,
    last_iter_div: i64,
    tasks: Vec<(String, TaskFn)>,
    results: Results,
}

impl DictionaryHandler {
    /// New handler with iteration cadence (0 is treated as 1)
    pub fn new(iter: usize) -> Self {
        Self {
            iter: iter.max(1),
            last_iter_div: -1,
            tasks: vec![],
            results: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a named task
    pub fn add_task(&mut self, name: &str, task: TaskFn) {
        self.tasks.push((name.to_string(), task));
    }

    /// Handle to the results
    pub fn results(&self) -> Results {
        Arc::clone(&self.results)
    }

    /// True if the iteration cadence has advanced since the last evaluation
    pub fn is_due(&self, schedule: &Schedule) -> bool {
        (schedule.iteration / self.iter) as i64 > self.last_iter_div
    }

    /// Evaluate all tasks and store the results
    pub fn process(&mut self, schedule: &Schedule, data: &GridData) {
        self.last_iter_div = (schedule.iteration / self.iter) as i64;
        let mut results = self
            .results
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for (name, task) in &self.tasks {
            results.insert(name.clone(), task(data));
        }
    }
}
