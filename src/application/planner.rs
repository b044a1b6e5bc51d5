// Solve orchestration: formulate once, solve once, accept only usable outcomes.

use crate::domain::{Solution, SolverConfig, SolverService};
use crate::error::{PlanningError, Result};
use crate::planning::{Formulation, PlanningDataset};
use crate::solver::SolverFactory;
use std::sync::Arc;
use tracing::{info, info_span, warn};

/// A formulated model together with the solution the solver returned.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub formulation: Formulation,
    pub solution: Solution,
    pub solver_name: String,
}

pub struct Planner {
    solver: Arc<dyn SolverService>,
}

impl Planner {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self { solver }
    }

    /// Instantiate the configured backend; fails before any model exists.
    pub fn for_config(config: &SolverConfig) -> Result<Self> {
        let solver = SolverFactory::create_from_backend(config.backend)?;
        info!(solver = solver.name(), "solver backend ready");
        Ok(Self::new(solver))
    }

    pub fn plan(&self, dataset: &PlanningDataset, config: SolverConfig) -> Result<PlanOutcome> {
        let span = info_span!("plan", dataset = %dataset.name);
        let _guard = span.enter();

        let formulation = Formulation::build(dataset, config)?;
        let solution = self.solve(&formulation)?;
        Ok(PlanOutcome {
            formulation,
            solution,
            solver_name: self.solver.name().to_string(),
        })
    }

    /// Single authoritative solve. Optimal and feasible outcomes are
    /// returned; anything else is an error.
    pub fn solve(&self, formulation: &Formulation) -> Result<Solution> {
        let solution = self.solver.solve(&formulation.problem)?;
        info!(
            solver = self.solver.name(),
            status = %solution.status,
            objective = ?solution.optimal_value,
            elapsed_ms = solution.statistics.solve_time_ms,
            max_violation = solution.quality.max_constraint_violation,
            "solve finished"
        );
        if !solution.is_feasible() {
            return Err(PlanningError::NoSolution {
                status: solution.status,
                message: solution.message,
            });
        }
        if !solution.quality.is_acceptable() {
            warn!(
                max_violation = solution.quality.max_constraint_violation,
                max_integrality = solution.quality.max_integrality_violation,
                "solution exceeds feasibility tolerance"
            );
        }
        if !solution.is_optimal() {
            warn!(status = %solution.status, "optimality not proven, reporting incumbent");
        }
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OptimizationProblem, Result as SolverResult, SolutionStatus};
    use crate::planning::testing::two_stage_dataset;

    struct FixedStatus(SolutionStatus);

    impl SolverService for FixedStatus {
        fn solve(&self, problem: &OptimizationProblem) -> SolverResult<Solution> {
            let values = vec![0.0; problem.num_variables()];
            Ok(match self.0 {
                SolutionStatus::Optimal => Solution::optimal(0.0, values),
                SolutionStatus::Feasible => Solution::feasible(0.0, values),
                other => Solution::new(other, "stub"),
            })
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn supports_mip(&self) -> bool {
            true
        }
    }

    fn plan_with(status: SolutionStatus) -> Result<PlanOutcome> {
        Planner::new(Arc::new(FixedStatus(status)))
            .plan(&two_stage_dataset(), SolverConfig::default())
    }

    #[test]
    fn optimal_and_feasible_are_accepted() {
        assert!(plan_with(SolutionStatus::Optimal).is_ok());
        let outcome = plan_with(SolutionStatus::Feasible).unwrap();
        assert_eq!(outcome.solution.status, SolutionStatus::Feasible);
    }

    #[test]
    fn other_statuses_are_fatal() {
        for status in [
            SolutionStatus::Infeasible,
            SolutionStatus::Unbounded,
            SolutionStatus::TimeLimit,
            SolutionStatus::Error,
        ] {
            match plan_with(status) {
                Err(PlanningError::NoSolution { status: got, .. }) => assert_eq!(got, status),
                other => panic!("expected failure for {status}, got {:?}", other.map(|_| ())),
            }
        }
    }
}
