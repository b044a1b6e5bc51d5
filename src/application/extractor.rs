// Result extraction.
//
// Read-only projections of a formulated and solved model: the coefficient
// matrix for auditing, per-constraint activity, the variable listing and
// the schedule expressed in dataset terms.

use super::planner::PlanOutcome;
use crate::domain::{
    OptimizationProblem, OptimizationType, Solution, SolutionStatus, SolverStatistics,
};
use crate::planning::{PlanningDataset, ProcessType};
use std::fmt;

/// Continuous values at or below this magnitude are left out of listings.
pub const REPORT_EPSILON: f64 = 1e-4;

/// Bound cell of the coefficient matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundCell {
    Value(f64),
    /// Objective direction marker (`MAX` / `MIN`).
    Sense(&'static str),
    Empty,
}

impl fmt::Display for BoundCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundCell::Value(v) if v.is_infinite() => {
                f.write_str(if *v > 0.0 { "inf" } else { "-inf" })
            }
            BoundCell::Value(v) => write!(f, "{v}"),
            BoundCell::Sense(s) => f.write_str(s),
            BoundCell::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub name: String,
    pub coefficients: Vec<f64>,
    pub lower: BoundCell,
    pub upper: BoundCell,
}

/// Dense constraint x variable matrix plus an objective row.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

impl CoefficientMatrix {
    pub fn from_problem(problem: &OptimizationProblem) -> Self {
        let width = problem.num_variables();
        let mut rows: Vec<MatrixRow> = problem
            .constraints
            .iter()
            .map(|c| {
                let mut coefficients = vec![0.0; width];
                for (var, coef) in &c.terms {
                    coefficients[var.index()] += coef;
                }
                MatrixRow {
                    name: c.name.clone(),
                    coefficients,
                    lower: BoundCell::Value(c.lower_bound()),
                    upper: BoundCell::Value(c.upper_bound()),
                }
            })
            .collect();

        let (lower, upper) = match problem.objective.optimization_type {
            OptimizationType::Minimize => (BoundCell::Sense("MIN"), BoundCell::Empty),
            OptimizationType::Maximize => (BoundCell::Empty, BoundCell::Sense("MAX")),
        };
        rows.push(MatrixRow {
            name: "Objective".to_string(),
            coefficients: problem.objective.coefficients.clone(),
            lower,
            upper,
        });

        Self {
            columns: problem.variables.iter().map(|v| v.name.clone()).collect(),
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableValue {
    pub name: String,
    pub value: f64,
    pub integer: bool,
}

impl VariableValue {
    /// Triggered binaries and non-negligible continuous values.
    pub fn is_reportable(&self) -> bool {
        if self.integer {
            self.value > 0.5
        } else {
            self.value.abs() > REPORT_EPSILON
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintActivity {
    pub name: String,
    pub lower: f64,
    pub value: f64,
    pub upper: f64,
}

/// A batch the plan schedules.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledBatch {
    pub resource: String,
    pub product: String,
    pub process: ProcessType,
    pub period: String,
    /// `None` for period-1 batches, which hold in every scenario.
    pub scenario: Option<String>,
    pub quantity: f64,
}

/// Everything a report or export needs from a solved plan.
#[derive(Debug, Clone)]
pub struct PlanResult {
    pub solver_name: String,
    pub status: SolutionStatus,
    pub objective_value: f64,
    pub statistics: SolverStatistics,
    pub two_stage: bool,
    pub variables: Vec<VariableValue>,
    pub constraints: Vec<ConstraintActivity>,
    pub schedule: Vec<ScheduledBatch>,
    pub matrix: CoefficientMatrix,
}

impl PlanResult {
    pub fn extract(dataset: &PlanningDataset, outcome: &PlanOutcome) -> Self {
        let problem = &outcome.formulation.problem;
        let solution = &outcome.solution;
        let values = &solution.variable_values;
        let value_of = |i: usize| values.get(i).copied().unwrap_or(0.0);

        let variables = problem
            .variables
            .iter()
            .enumerate()
            .map(|(i, v)| VariableValue {
                name: v.name.clone(),
                value: value_of(i),
                integer: v.is_integer(),
            })
            .collect();

        let constraints = problem
            .constraints
            .iter()
            .map(|c| ConstraintActivity {
                name: c.name.clone(),
                lower: c.lower_bound(),
                value: c.activity(values),
                upper: c.upper_bound(),
            })
            .collect();

        Self {
            solver_name: outcome.solver_name.clone(),
            status: solution.status,
            objective_value: solution
                .optimal_value
                .unwrap_or_else(|| problem.objective.evaluate(values)),
            statistics: solution.statistics.clone(),
            two_stage: outcome.formulation.two_stage,
            variables,
            constraints,
            schedule: schedule(dataset, outcome, solution),
            matrix: CoefficientMatrix::from_problem(problem),
        }
    }

    pub fn reportable_variables(&self) -> impl Iterator<Item = &VariableValue> {
        self.variables.iter().filter(|v| v.is_reportable())
    }

    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.variables.iter().find(|v| v.name == name).map(|v| v.value)
    }

    pub fn activity_of(&self, name: &str) -> Option<&ConstraintActivity> {
        self.constraints.iter().find(|c| c.name == name)
    }
}

fn schedule(dataset: &PlanningDataset, outcome: &PlanOutcome, solution: &Solution) -> Vec<ScheduledBatch> {
    let vars = &outcome.formulation.vars;
    let on = |id| solution.value(id).is_some_and(|v| v > 0.5);
    let batch = |resource: usize, product: usize, process: ProcessType| {
        dataset
            .recipe(resource, product, process)
            .map_or(0.0, |r| r.batch_size)
    };

    let first = vars.first_stage.iter().filter(|&(_, &id)| on(id)).map(|(k, _)| ScheduledBatch {
        resource: dataset.resources[k.resource].name.clone(),
        product: dataset.products[k.product].name.clone(),
        process: k.process,
        period: dataset.periods[0].clone(),
        scenario: None,
        quantity: batch(k.resource, k.product, k.process),
    });
    let recourse = vars.recourse.iter().filter(|&(_, &id)| on(id)).map(|(k, _)| ScheduledBatch {
        resource: dataset.resources[k.resource].name.clone(),
        product: dataset.products[k.product].name.clone(),
        process: k.process,
        period: dataset.periods[1].clone(),
        scenario: Some(dataset.scenarios[k.scenario].name.clone()),
        quantity: batch(k.resource, k.product, k.process),
    });
    first.chain(recourse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constraint, ConstraintType, SolverConfig, Variable};
    use crate::planning::testing::two_stage_dataset;
    use crate::planning::Formulation;

    #[test]
    fn matrix_has_row_per_constraint_plus_objective() {
        let mut problem = OptimizationProblem::new(OptimizationType::Maximize);
        let x = problem.add_variable(Variable::binary("x")).unwrap();
        let y = problem.add_variable(Variable::continuous("y")).unwrap();
        problem
            .add_constraint(
                Constraint::new(ConstraintType::GreaterThanOrEqual, vec![(y, 2.0), (x, -1.0)], 0.0)
                    .with_name("link"),
            )
            .unwrap();
        problem.set_objective_coefficient(x, 3.0).unwrap();

        let matrix = CoefficientMatrix::from_problem(&problem);
        assert_eq!(matrix.columns, vec!["x", "y"]);
        assert_eq!(matrix.rows.len(), 2);
        assert_eq!(matrix.rows[0].coefficients, vec![-1.0, 2.0]);
        assert_eq!(matrix.rows[0].upper.to_string(), "inf");
        assert_eq!(matrix.rows[1].name, "Objective");
        assert_eq!(matrix.rows[1].coefficients, vec![3.0, 0.0]);
        assert_eq!(matrix.rows[1].upper, BoundCell::Sense("MAX"));
        assert_eq!(matrix.rows[1].lower.to_string(), "");
    }

    #[test]
    fn listing_filters_idle_binaries_and_tiny_values() {
        let idle = VariableValue { name: "b".into(), value: 0.0, integer: true };
        let on = VariableValue { name: "b".into(), value: 1.0, integer: true };
        let noise = VariableValue { name: "c".into(), value: 5e-5, integer: false };
        let real = VariableValue { name: "c".into(), value: -2.0, integer: false };
        assert!(!idle.is_reportable());
        assert!(on.is_reportable());
        assert!(!noise.is_reportable());
        assert!(real.is_reportable());
    }

    #[test]
    fn extraction_projects_values_activity_and_schedule() {
        let ds = two_stage_dataset();
        let formulation = Formulation::build(&ds, SolverConfig::default()).unwrap();
        let mut values = vec![0.0; formulation.problem.num_variables()];
        let std_a = formulation
            .problem
            .variables
            .iter()
            .position(|v| v.name == "produce A at R1 using Std on P1")
            .unwrap();
        values[std_a] = 1.0;
        let outcome = PlanOutcome {
            solution: Solution::optimal(0.0, values),
            formulation,
            solver_name: "test".into(),
        };

        let result = PlanResult::extract(&ds, &outcome);
        assert_eq!(result.value_of("produce A at R1 using Std on P1"), Some(1.0));
        let capacity = result.activity_of("capacity of R1 on P1").unwrap();
        assert_eq!((capacity.lower, capacity.value, capacity.upper), (1.0, 1.0, 1.0));
        assert_eq!(result.schedule.len(), 1);
        assert_eq!(result.schedule[0].quantity, 10.0);
        assert_eq!(result.schedule[0].scenario, None);
        assert_eq!(result.reportable_variables().count(), 1);
    }
}
