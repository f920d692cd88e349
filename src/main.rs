use clap::{arg, command, value_parser};
use rayon::ThreadPoolBuilder;
use rbc_quickstart::{experiment, Config};
use std::path::PathBuf;
use tracing::{error, info, Level};

fn main() {
    let matches = command!()
        .about("Two-dimensional Rayleigh-Benard convection")
        .arg(
            arg!(
                -n --name <NAME> "Name of the experiment, the directory it runs in"
            )
            .required(true)
            .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(
                -c --cores <CORES> "Sets the number of worker threads"
            )
            .required(false)
            .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(
                -v --verbosity <VERBOSITY> "Log level: 0 warn, 1 info, 2 debug"
            )
            .required(false)
            .default_value("1")
            .value_parser(value_parser!(u8).range(0..=2)),
        )
        .arg(
            arg!(
                --config <FILE> "Toml file overriding the default parameters"
            )
            .required(false)
            .value_parser(value_parser!(PathBuf)),
        )
        .get_matches();

    let level = match matches.get_one::<u8>("verbosity") {
        Some(0) => Level::WARN,
        Some(2) => Level::DEBUG,
        _ => Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Some(&num_threads) = matches.get_one::<usize>("cores") {
        if let Err(e) = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            error!("Cannot set up thread pool: {}", e);
            std::process::exit(1);
        }
    }

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Cannot read config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    let Some(workdir) = matches.get_one::<PathBuf>("name") else {
        std::process::exit(2);
    };
    if let Err(e) = std::fs::create_dir_all(workdir) {
        error!("Cannot create experiment directory {}: {}", workdir.display(), e);
        std::process::exit(1);
    }
    info!("Running experiment in {}", workdir.display());

    if let Err(e) = experiment::run(&config, workdir) {
        error!("Experiment failed: {}", e);
        std::process::exit(1);
    }
}
