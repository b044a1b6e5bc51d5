// Domain service interface for solving optimization problems
// Any backend adapter implements this contract; the planner only sees the trait.

use super::models::{OptimizationProblem, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization solvers
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem.
    ///
    /// Terminal outcomes such as infeasibility are reported through
    /// [`Solution::status`]; `Err` is reserved for problems the backend could
    /// not even attempt.
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();

        if problem.variables.is_empty() {
            errors.push("Problem must have at least one variable".to_string());
        }

        let num_vars = problem.num_variables();

        if problem.objective.num_variables() != num_vars {
            errors.push(format!(
                "Number of variables ({}) doesn't match objective coefficients ({})",
                num_vars,
                problem.objective.num_variables()
            ));
        }

        for (i, constraint) in problem.constraints.iter().enumerate() {
            if constraint.terms.iter().any(|(v, _)| v.index() >= num_vars) {
                errors.push(format!(
                    "Constraint {} '{}' references a variable outside the problem",
                    i, constraint.name
                ));
            }
            if !constraint.bound.is_finite() {
                errors.push(format!(
                    "Constraint {} '{}' has a non-finite bound",
                    i, constraint.name
                ));
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if problem.is_mixed_integer() && !self.supports_mip() {
            errors.push(format!("{} cannot solve integer variables", self.name()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}
