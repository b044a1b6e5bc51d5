use crate::domain::{SolutionStatus, SolverError};
use crate::planning::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a planning run can fail. Each one ends the run without output.
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("the solver could not solve the problem ({status}): {message}")]
    NoSolution {
        status: SolutionStatus,
        message: String,
    },

    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PlanningError>;
