//! Error type shared by the solver, the output handlers and the experiment
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while setting up or running a simulation
#[derive(Error, Debug)]
pub enum Error {
    /// Failure inside the hdf5 library (missing file, dataset, ...)
    #[error("hdf5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
    /// File system error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration file could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// Zero pivot while factorizing a linear operator
    #[error("singular matrix (zero pivot in row {row})")]
    SingularMatrix {
        /// Row of the vanishing pivot
        row: usize,
    },
    /// Array shapes do not agree, e.g. a checkpoint from another grid
    #[error("shape mismatch for `{name}`: got {got:?}, expected {expected:?}")]
    ShapeMismatch {
        /// Name of the array
        name: String,
        /// Shape found
        got: Vec<usize>,
        /// Shape required
        expected: Vec<usize>,
    },
    /// A flow property was requested that was never registered
    #[error("unknown flow property `{0}`")]
    UnknownProperty(String),
    /// A diagnostic was requested before its first evaluation
    #[error("property `{0}` has not been evaluated yet")]
    NotEvaluated(String),
    /// The solution contains NaN or inf
    #[error("non-finite values in solution at iteration {iteration}")]
    NonFinite {
        /// Iteration at which the blow-up was detected
        iteration: usize,
    },
    /// Grid sizes or box lengths that admit no discretization
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
    /// Write index out of range for a snapshot file
    #[error("write index {index} out of range for {writes} writes")]
    InvalidIndex {
        /// Requested index (negative counts from the end)
        index: isize,
        /// Number of writes in the file
        writes: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_shows_cause() {
        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "no restart.h5"));
        assert_eq!(err.to_string(), "io error: no restart.h5");
    }

    #[test]
    fn test_missing_config_file_names_cause() {
        let dir = tempfile::tempdir().unwrap();
        let err = crate::Config::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        let message = err.to_string();
        assert!(message.starts_with("io error: "));
        assert!(message.len() > "io error: ".len());
    }
}
