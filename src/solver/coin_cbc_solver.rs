// COIN-OR CBC Solver Adapter (through good_lp)

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolutionQuality, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus as DomainSolutionStatus},
};
use good_lp::{
    solvers::{coin_cbc, SolutionStatus as GoodLpStatus},
    variable, variables, Expression, ResolutionError, Solution as GoodLpSolutionTrait,
    SolverModel, Variable as GoodLpVariable,
};
use std::time::Instant;
use tracing::debug;

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();

        // Build variables using good_lp
        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(problem.num_variables());

        for var_def in problem.variables.iter() {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);
            let definition = variable().min(lower).max(upper).name(var_def.name.clone());
            let var = if var_def.is_integer() {
                vars.add(definition.integer())
            } else {
                vars.add(definition)
            };
            lp_variables.push(var);
        }

        // Build objective expression
        let mut obj_expr: Expression = 0.into();
        for (i, &coeff) in problem.objective.coefficients.iter().enumerate() {
            if coeff != 0.0 {
                obj_expr += coeff * lp_variables[i];
            }
        }

        let mut lp_model = match problem.objective.optimization_type {
            OptimizationType::Maximize => vars.maximise(obj_expr),
            OptimizationType::Minimize => vars.minimise(obj_expr),
        }
        .using(coin_cbc::coin_cbc);

        let config = &problem.solver_config;
        if !config.verbose {
            lp_model.set_parameter("log", "0");
        }
        if let Some(limit) = config.time_limit {
            lp_model.set_parameter("sec", &limit.to_string());
        }
        if let Some(gap) = config.gap_tolerance {
            lp_model.set_parameter("ratioGap", &gap.to_string());
        }

        // Build constraints
        for constraint in &problem.constraints {
            let mut lhs: Expression = 0.into();
            for &(var, coeff) in &constraint.terms {
                if coeff != 0.0 {
                    lhs += coeff * lp_variables[var.index()];
                }
            }

            lp_model = match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => lp_model.with(lhs.leq(constraint.bound)),
                ConstraintType::Equal => lp_model.with(lhs.eq(constraint.bound)),
                ConstraintType::GreaterThanOrEqual => lp_model.with(lhs.geq(constraint.bound)),
            };
        }

        // Solve the problem
        let solution_result = lp_model.solve();
        let mut statistics = SolverStatistics::for_problem(problem);
        statistics.solve_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        let solution = match solution_result {
            Ok(sol) => {
                let variable_values: Vec<f64> =
                    lp_variables.iter().map(|&var| sol.value(var)).collect();
                let quality = SolutionQuality::measure(problem, &variable_values);
                let value = problem.objective.evaluate(&variable_values);
                debug!(status = ?sol.status(), elapsed_ms = statistics.solve_time_ms, "CBC returned");

                let solution = match sol.status() {
                    GoodLpStatus::Optimal => {
                        let mut solution = DomainSolution::optimal(value, variable_values);
                        solution.message = format!("Optimal solution found for '{}'", problem.name);
                        solution
                    }
                    _ if problem.is_feasible_assignment(&variable_values) => {
                        DomainSolution::feasible(value, variable_values)
                    }
                    _ => DomainSolution::new(
                        DomainSolutionStatus::TimeLimit,
                        "CBC stopped early without a feasible incumbent",
                    ),
                };
                solution.with_quality(quality)
            }
            Err(ResolutionError::Infeasible) => DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            ),
            Err(ResolutionError::Unbounded) => DomainSolution::new(
                DomainSolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            ),
            Err(e) => return Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        };

        Ok(solution.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
