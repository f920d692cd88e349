//! # Snapshot output
//!
//! A file handler writes its tasks into a sequence of hdf5 files (sets)
//! `<dir>/<name>/<name>_s<set>.h5`, each holding at most `max_writes`
//! writes. Layout of a set:
//!
//! ```text
//! scales/sim_time      (writes,)
//! scales/timestep      (writes,)
//! scales/wall_time     (writes,)
//! scales/iteration     (writes,)
//! scales/write_number  (writes,)
//! scales/x             (nx,)
//! scales/z             (nz,)
//! tasks/<variable>     (writes, nx, nz)
//! ```
use super::{cadence_div, GridData, Schedule};
use crate::bases::BaseBasics;
use crate::domain::Domain;
use crate::error::Result;
use crate::hdf5::{
    append_2d, append_scalar, create_series, create_series_2d, gen_name_path, read_scalar_at,
    require_group, series_len, write_array1,
};
use crate::navier::Variable;
use ndarray::Array1;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How to treat sets of an earlier run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Remove earlier sets and start counting from one
    Overwrite,
    /// Keep earlier sets, continue set and write numbers
    Append,
}

/// Writes snapshots of the state variables
pub struct FileHandler {
    name: String,
    base_path: PathBuf,
    sim_dt: Option<f64>,
    iter: Option<usize>,
    max_writes: usize,
    tasks: Vec<Variable>,
    grid: [Array1<f64>; 2],
    shape: [usize; 2],
    set_num: usize,
    file_write_num: usize,
    total_write_num: usize,
    current: Option<PathBuf>,
    last_sim_div: i64,
    last_iter_div: i64,
}

impl FileHandler {
    /// New handler writing below `dir/name`
    ///
    /// # Errors
    /// File system errors while preparing the directory.
    pub fn new<P: AsRef<Path>>(
        dir: P,
        name: &str,
        domain: &Domain,
        max_writes: usize,
        mode: FileMode,
    ) -> Result<Self> {
        let base_path = dir.as_ref().join(name);
        let (set_num, total_write_num) = match mode {
            FileMode::Overwrite => {
                if base_path.exists() {
                    std::fs::remove_dir_all(&base_path)?;
                }
                std::fs::create_dir_all(&base_path)?;
                (1, 0)
            }
            FileMode::Append => {
                std::fs::create_dir_all(&base_path)?;
                match last_set(&base_path, name)? {
                    Some(max_set) => {
                        let path = set_path(&base_path, name, max_set);
                        let last_write = last_write_number(&path).unwrap_or_else(|_| {
                            warn!("Cannot determine write num from files. Restarting count.");
                            0
                        });
                        (max_set + 1, last_write)
                    }
                    None => (1, 0),
                }
            }
        };
        Ok(Self {
            name: name.to_string(),
            base_path,
            sim_dt: None,
            iter: None,
            max_writes: max_writes.max(1),
            tasks: vec![],
            grid: domain.bases().map(|base| base.coords().to_owned()),
            shape: domain.shape_phys(),
            set_num,
            file_write_num: 0,
            total_write_num,
            current: None,
            last_sim_div: -1,
            last_iter_div: -1,
        })
    }

    /// Write whenever floor(sim_time / sim_dt) advances
    pub fn set_sim_dt(&mut self, sim_dt: f64) -> &mut Self {
        self.sim_dt = Some(sim_dt);
        self
    }

    /// Write every `iter` iterations
    pub fn set_iter(&mut self, iter: usize) -> &mut Self {
        self.iter = Some(iter.max(1));
        self
    }

    /// Add single variable
    pub fn add_task(&mut self, variable: Variable) -> &mut Self {
        if !self.tasks.contains(&variable) {
            self.tasks.push(variable);
        }
        self
    }

    /// Add all state variables
    pub fn add_system(&mut self) -> &mut Self {
        for variable in Variable::ALL {
            self.add_task(variable);
        }
        self
    }

    /// Number of the set written next (or currently written)
    pub fn set_num(&self) -> usize {
        self.set_num
    }

    /// Total number of writes, including those of earlier runs in
    /// append mode
    pub fn total_write_num(&self) -> usize {
        self.total_write_num
    }

    /// Set file currently written to
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// True if the time or the iteration cadence has advanced
    pub fn is_due(&self, schedule: &Schedule) -> bool {
        let sim = self
            .sim_dt
            .map_or(false, |dt| cadence_div(schedule.sim_time, dt) > self.last_sim_div);
        let iter = self
            .iter
            .map_or(false, |it| (schedule.iteration / it) as i64 > self.last_iter_div);
        sim || iter
    }

    /// Write tasks
    ///
    /// # Errors
    /// Failure to create or extend the set file.
    pub fn process(&mut self, schedule: &Schedule, data: &GridData) -> Result<()> {
        if let Some(dt) = self.sim_dt {
            self.last_sim_div = cadence_div(schedule.sim_time, dt);
        }
        if let Some(it) = self.iter {
            self.last_iter_div = (schedule.iteration / it) as i64;
        }
        if self.current.is_none() || self.file_write_num >= self.max_writes {
            self.create_set()?;
        }
        let path = set_path(&self.base_path, &self.name, self.set_num);
        let file = hdf5::File::open_rw(&path)?;
        self.total_write_num += 1;
        self.file_write_num += 1;
        append_scalar(&file.dataset("scales/sim_time")?, schedule.sim_time)?;
        append_scalar(&file.dataset("scales/timestep")?, schedule.timestep)?;
        append_scalar(&file.dataset("scales/wall_time")?, schedule.wall_time)?;
        append_scalar(&file.dataset("scales/iteration")?, schedule.iteration as u64)?;
        append_scalar(
            &file.dataset("scales/write_number")?,
            self.total_write_num as u64,
        )?;
        for task in &self.tasks {
            let dset = file.dataset(&gen_name_path(task.name(), Some("tasks")))?;
            append_2d(&dset, data.get(*task))?;
        }
        debug!(
            "{}: write {} (set {}) at sim time {}",
            self.name, self.total_write_num, self.set_num, schedule.sim_time
        );
        Ok(())
    }

    fn create_set(&mut self) -> Result<()> {
        if self.current.is_some() {
            self.set_num += 1;
        }
        let path = set_path(&self.base_path, &self.name, self.set_num);
        let file = hdf5::File::create(&path)?;
        let scales = require_group(&file, "scales")?;
        let tasks = require_group(&file, "tasks")?;
        for name in ["sim_time", "timestep", "wall_time"] {
            create_series::<f64>(&scales, name)?;
        }
        for name in ["iteration", "write_number"] {
            create_series::<u64>(&scales, name)?;
        }
        write_array1(&scales, "x", &self.grid[0])?;
        write_array1(&scales, "z", &self.grid[1])?;
        for task in &self.tasks {
            create_series_2d(&tasks, task.name(), self.shape)?;
        }
        self.file_write_num = 0;
        self.current = Some(path);
        Ok(())
    }
}

/// Path of set file
pub fn set_path(base_path: &Path, name: &str, set_num: usize) -> PathBuf {
    base_path.join(format!("{}_s{}.h5", name, set_num))
}

/// Highest set number in directory
fn last_set(base_path: &Path, name: &str) -> Result<Option<usize>> {
    let prefix = format!("{}_s", name);
    let mut max_set = None;
    for entry in std::fs::read_dir(base_path)? {
        let file_name = entry?.file_name();
        let num = file_name
            .to_str()
            .and_then(|s| s.strip_prefix(&prefix))
            .and_then(|s| s.strip_suffix(".h5"))
            .and_then(|s| s.parse::<usize>().ok());
        if let Some(num) = num {
            max_set = max_set.max(Some(num));
        }
    }
    Ok(max_set)
}

fn last_write_number(path: &Path) -> Result<usize> {
    let file = hdf5::File::open(path)?;
    let writes = series_len(&file, "scales/write_number")?;
    if writes == 0 {
        return Ok(0);
    }
    let last: u64 = read_scalar_at(&file, "scales/write_number", writes - 1)?;
    Ok(last as usize)
}
