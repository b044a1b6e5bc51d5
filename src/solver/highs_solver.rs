// HiGHS Solver Adapter
// Translates the domain problem registry into a HiGHS row problem.

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolutionQuality, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus as DomainSolutionStatus},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;
use tracing::debug;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();
        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(problem.num_variables());

        // Add variables
        for (i, var_def) in problem.variables.iter().enumerate() {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);
            let obj_coeff = problem.objective.coefficients.get(i).copied().unwrap_or(0.0);

            let col = if var_def.is_integer() {
                pb.add_integer_column(obj_coeff, lower..=upper)
            } else {
                pb.add_column(obj_coeff, lower..=upper)
            };
            cols.push(col);
        }

        // Add constraints
        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .terms
                .iter()
                .filter(|(_, coeff)| *coeff != 0.0)
                .map(|(var, coeff)| (cols[var.index()], *coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = if problem.objective.optimization_type == OptimizationType::Maximize {
            Sense::Maximise
        } else {
            Sense::Minimise
        };

        let mut model = pb.optimise(sense);
        let config = &problem.solver_config;
        model.set_option("output_flag", config.verbose);
        if let Some(limit) = config.time_limit {
            model.set_option("time_limit", limit);
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }

        let solved = model.solve();
        let mut statistics = SolverStatistics::for_problem(problem);
        statistics.solve_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;
        debug!(status = ?solved.status(), elapsed_ms = statistics.solve_time_ms, "HiGHS returned");

        let incumbent = |status: DomainSolutionStatus| {
            let values = solved.get_solution().columns().to_vec();
            let quality = SolutionQuality::measure(problem, &values);
            let value = problem.objective.evaluate(&values);
            let solution = match status {
                DomainSolutionStatus::Optimal => DomainSolution::optimal(value, values),
                // A limit-terminated run is only usable if its incumbent checks out.
                _ if problem.is_feasible_assignment(&values) => DomainSolution::feasible(value, values),
                _ => DomainSolution::new(
                    status,
                    format!("HiGHS stopped early without a feasible incumbent ({status})"),
                ),
            };
            solution.with_quality(quality)
        };

        let solution = match solved.status() {
            HighsModelStatus::Optimal => {
                let mut solution = incumbent(DomainSolutionStatus::Optimal);
                solution.message = format!("Optimal solution found for '{}'", problem.name);
                solution
            }
            HighsModelStatus::ReachedTimeLimit => incumbent(DomainSolutionStatus::TimeLimit),
            HighsModelStatus::ReachedIterationLimit => {
                incumbent(DomainSolutionStatus::IterationLimit)
            }
            HighsModelStatus::Infeasible => DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            ),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                DomainSolution::new(
                    DomainSolutionStatus::Unbounded,
                    "Problem is unbounded or infeasible",
                )
            }
            status => {
                return Err(SolverError::ExecutionFailed(format!(
                    "HiGHS solver returned status: {:?}",
                    status
                )))
            }
        };

        Ok(solution.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
