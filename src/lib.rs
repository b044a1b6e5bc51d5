// Domain layer: optimization model and solver contract
pub mod domain;

// Planning layer: dataset, loader and the MIP formulation
pub mod planning;

// Application layer: solve orchestration, extraction and artifacts
pub mod application;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use domain::{
    Constraint, ConstraintType, ObjectiveFunction, OptimizationProblem, OptimizationType, Solution,
    SolutionStatus, SolverBackend, SolverConfig, SolverError, SolverService, Variable,
    VariableType,
};

pub use application::{run, PlanOutcome, PlanResult, Planner};
pub use error::{PlanningError, Result};
pub use planning::{load_from_path, load_from_str, Formulation, PlanningDataset};
pub use solver::SolverFactory;

#[cfg(feature = "cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "highs")]
pub use solver::HighsSolver;
