// Domain value objects shared by the formulation and the solver adapters

use serde::Deserialize;
use std::fmt;

/// Type of decision variable in the optimization problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    Continuous,
    /// Integer number (x ∈ ℤ)
    Integer,
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

/// Status of the optimization solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Found optimal solution
    Optimal,
    /// Found feasible solution (may not be optimal)
    Feasible,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// Time limit reached without a usable incumbent
    TimeLimit,
    /// Iteration limit reached without a usable incumbent
    IterationLimit,
    /// Node limit reached (MIP)
    NodeLimit,
    /// Solver error occurred
    Error,
}

impl SolutionStatus {
    /// Optimal or feasible: a solution a plan can be read from.
    pub fn is_usable(&self) -> bool {
        matches!(self, SolutionStatus::Optimal | SolutionStatus::Feasible)
    }

    /// Human-readable narrative used at the top of the result report.
    pub fn narrative(&self) -> &'static str {
        match self {
            SolutionStatus::Optimal => "Optimal Solution Found",
            SolutionStatus::Feasible => "Stopped At Suboptimal Feasible Solution",
            SolutionStatus::Infeasible => "Problem Is Infeasible",
            SolutionStatus::Unbounded => "Problem Is Unbounded",
            SolutionStatus::TimeLimit
            | SolutionStatus::IterationLimit
            | SolutionStatus::NodeLimit => "Solver Stopped Without A Solution",
            SolutionStatus::Error => "The Solver Could Not Solve The Problem",
        }
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Feasible => write!(f, "Feasible"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::TimeLimit => write!(f, "Time Limit Reached"),
            SolutionStatus::IterationLimit => write!(f, "Iteration Limit Reached"),
            SolutionStatus::NodeLimit => write!(f, "Node Limit Reached"),
            SolutionStatus::Error => write!(f, "Error"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// Automatically select best compiled-in solver
    #[default]
    Auto,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}
