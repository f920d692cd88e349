//! Fresh starts and restarts of the quickstart experiment
use rbc_quickstart::evaluator::file_handler::set_path;
use rbc_quickstart::hdf5::{open, read_scalar_at, series_len};
use rbc_quickstart::{experiment, Config, Error};
use std::path::Path;

fn small_config() -> Config {
    Config::from_toml(
        r#"
[domain]
nx = 16
nz = 9

[physics]
rayleigh = 1e4

[run]
initial_dt = 0.05
stop_sim_time = 0.5
restart_stop_sim_time = 0.75

[output]
sim_dt = 0.1
max_writes = 3

[cfl]
max_dt = 0.05
"#,
    )
    .unwrap()
}

fn sets(dir: &Path) -> Vec<usize> {
    let mut sets: Vec<usize> = (1..100)
        .filter(|s| set_path(dir, "snapshots", *s).exists())
        .collect();
    sets.sort_unstable();
    sets
}

fn last_write(path: &Path) -> (u64, f64, u64) {
    let file = open(path).unwrap();
    let n = series_len(&file, "scales/write_number").unwrap();
    (
        read_scalar_at(&file, "scales/write_number", n - 1).unwrap(),
        read_scalar_at(&file, "scales/sim_time", n - 1).unwrap(),
        read_scalar_at(&file, "scales/iteration", n - 1).unwrap(),
    )
}

#[test]
fn test_fresh_start_and_restart() {
    let workdir = tempfile::tempdir().unwrap();
    let config = small_config();
    let snapshots = workdir.path().join("snapshots");

    // fresh start
    let stats = experiment::run(&config, workdir.path()).unwrap();
    assert!(stats.sim_time >= 0.5 - 1e-12);
    assert!(stats.sim_time < 0.6);
    assert!(stats.iterations >= 10);
    let fresh_sets = sets(&snapshots);
    assert_eq!(fresh_sets[0], 1);
    let last_set = *fresh_sets.last().unwrap();
    let (write, sim_time, iteration) = last_write(&set_path(&snapshots, "snapshots", last_set));
    assert!(write >= 4);
    assert!(sim_time > 0.3);

    // restart from the last write
    std::fs::copy(
        set_path(&snapshots, "snapshots", last_set),
        workdir.path().join("restart.h5"),
    )
    .unwrap();
    let stats = experiment::run(&config, workdir.path()).unwrap();
    assert!(stats.sim_time >= 0.75 - 1e-12);
    assert!(stats.iterations > iteration as usize);
    let restart_sets = sets(&snapshots);
    assert!(restart_sets.len() > fresh_sets.len());
    assert_eq!(&restart_sets[..fresh_sets.len()], &fresh_sets[..]);

    // numbering continues after the loaded write
    let first_new = set_path(&snapshots, "snapshots", last_set + 1);
    let file = open(&first_new).unwrap();
    let first_write: u64 = read_scalar_at(&file, "scales/write_number", 0).unwrap();
    let first_time: f64 = read_scalar_at(&file, "scales/sim_time", 0).unwrap();
    let first_iteration: u64 = read_scalar_at(&file, "scales/iteration", 0).unwrap();
    assert_eq!(first_write, write + 1);
    assert!((first_time - sim_time).abs() < 1e-12);
    assert_eq!(first_iteration, iteration);
}

#[test]
fn test_invalid_restart_file() {
    let workdir = tempfile::tempdir().unwrap();
    std::fs::write(workdir.path().join("restart.h5"), b"not hdf5").unwrap();
    assert!(experiment::run(&small_config(), workdir.path()).is_err());
}

#[test]
fn test_second_fresh_start_replaces_sets() {
    let workdir = tempfile::tempdir().unwrap();
    let snapshots = workdir.path().join("snapshots");

    // long run leaves several sets behind
    let config = small_config();
    experiment::run(&config, workdir.path()).unwrap();
    let first_sets = sets(&snapshots);
    assert!(first_sets.len() >= 2);

    // short fresh run, writes at t = 0 and t = 0.1 fit into one set
    let mut config = small_config();
    config.run.stop_sim_time = 0.15;
    experiment::run(&config, workdir.path()).unwrap();
    assert_eq!(sets(&snapshots), vec![1]);

    let file = open(set_path(&snapshots, "snapshots", 1)).unwrap();
    let writes = series_len(&file, "scales/write_number").unwrap();
    assert_eq!(writes, 2);
    let first_write: u64 = read_scalar_at(&file, "scales/write_number", 0).unwrap();
    let first_time: f64 = read_scalar_at(&file, "scales/sim_time", 0).unwrap();
    let (final_write, final_time, _) = last_write(&set_path(&snapshots, "snapshots", 1));
    assert_eq!(first_write, 1);
    assert_eq!(final_write, 2);
    assert!(first_time.abs() < 1e-15);
    assert!(final_time < 0.15);
}

#[test]
fn test_invalid_grid_is_an_error() {
    let workdir = tempfile::tempdir().unwrap();
    let mut config = small_config();
    config.domain.nz = 1;
    assert!(matches!(
        experiment::run(&config, workdir.path()),
        Err(Error::InvalidDomain(_))
    ));
    assert!(!workdir.path().join("snapshots").exists());
}
