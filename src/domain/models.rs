use super::value_objects::{
    ConstraintType, OptimizationType, SolutionStatus, SolverBackend, VariableType,
};
use super::solver_service::{Result, SolverError};
use serde::Deserialize;
use std::collections::HashSet;

/// Absolute tolerance used when checking a candidate solution against the model.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Handle of a variable registered in an [`OptimizationProblem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Decision variable in an optimization problem
#[derive(Debug, Clone)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Continuous,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: Option<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.variable_type,
            VariableType::Integer | VariableType::Binary
        )
    }
}

/// Objective function to minimize or maximize.
///
/// Holds one coefficient per registered variable; variables that never
/// receive a coefficient contribute zero.
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    pub coefficients: Vec<f64>,
}

impl ObjectiveFunction {
    pub fn new(optimization_type: OptimizationType) -> Self {
        Self {
            optimization_type,
            coefficients: Vec::new(),
        }
    }

    pub fn coefficient(&self, var: VarId) -> f64 {
        self.coefficients.get(var.index()).copied().unwrap_or(0.0)
    }

    /// Objective value of a full assignment of variable values.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum()
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }
}

/// Linear constraint over a sparse set of variables
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub terms: Vec<(VarId, f64)>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, terms: Vec<(VarId, f64)>, bound: f64) -> Self {
        Self {
            constraint_type,
            terms,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Combined coefficient of `var` in this row (repeated terms are summed).
    pub fn coefficient(&self, var: VarId) -> f64 {
        self.terms
            .iter()
            .filter(|(v, _)| *v == var)
            .map(|(_, c)| c)
            .sum()
    }

    /// Row activity (left-hand side) for a full assignment of variable values.
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v.index()).copied().unwrap_or(0.0))
            .sum()
    }

    pub fn lower_bound(&self) -> f64 {
        match self.constraint_type {
            ConstraintType::LessThanOrEqual => f64::NEG_INFINITY,
            ConstraintType::Equal | ConstraintType::GreaterThanOrEqual => self.bound,
        }
    }

    pub fn upper_bound(&self) -> f64 {
        match self.constraint_type {
            ConstraintType::GreaterThanOrEqual => f64::INFINITY,
            ConstraintType::Equal | ConstraintType::LessThanOrEqual => self.bound,
        }
    }

    /// Amount by which `values` violates this row (zero when satisfied).
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.activity(values);
        (self.lower_bound() - lhs).max(lhs - self.upper_bound()).max(0.0)
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }
}

/// Configuration for the solver
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    pub time_limit: Option<f64>,
    pub gap_tolerance: Option<f64>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            gap_tolerance: None,
            verbose: false,
        }
    }
}

/// Complete optimization problem.
///
/// Acts as the variable and constraint registry while a model is being
/// formulated; adapters only read it.
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    pub name: String,
    pub description: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver_config: SolverConfig,
    variable_names: HashSet<String>,
    constraint_names: HashSet<String>,
}

impl OptimizationProblem {
    pub fn new(optimization_type: OptimizationType) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            objective: ObjectiveFunction::new(optimization_type),
            constraints: Vec::new(),
            variables: Vec::new(),
            solver_config: SolverConfig::default(),
            variable_names: HashSet::new(),
            constraint_names: HashSet::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    /// Register a variable. Names must be unique within the problem.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VarId> {
        if !self.variable_names.insert(variable.name.clone()) {
            return Err(SolverError::InvalidProblem(format!(
                "duplicate variable name '{}'",
                variable.name
            )));
        }
        let id = VarId(self.variables.len());
        self.variables.push(variable);
        self.objective.coefficients.push(0.0);
        Ok(id)
    }

    /// Register a constraint. Names must be unique and every term must
    /// reference an already registered variable.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<()> {
        if let Some((var, _)) = constraint
            .terms
            .iter()
            .find(|(v, _)| v.index() >= self.variables.len())
        {
            return Err(SolverError::InvalidProblem(format!(
                "constraint '{}' references unknown variable #{}",
                constraint.name,
                var.index()
            )));
        }
        if !self.constraint_names.insert(constraint.name.clone()) {
            return Err(SolverError::InvalidProblem(format!(
                "duplicate constraint name '{}'",
                constraint.name
            )));
        }
        self.constraints.push(constraint);
        Ok(())
    }

    pub fn set_objective_coefficient(&mut self, var: VarId, coefficient: f64) -> Result<()> {
        match self.objective.coefficients.get_mut(var.index()) {
            Some(slot) => {
                *slot = coefficient;
                Ok(())
            }
            None => Err(SolverError::InvalidProblem(format!(
                "objective references unknown variable #{}",
                var.index()
            ))),
        }
    }

    pub fn constraint_by_name(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_integer_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integer()).count()
    }

    pub fn is_mixed_integer(&self) -> bool {
        self.num_integer_variables() > 0
    }

    /// Largest row or bound violation of a candidate assignment.
    pub fn max_constraint_violation(&self, values: &[f64]) -> f64 {
        let rows = self
            .constraints
            .iter()
            .map(|c| c.violation(values))
            .fold(0.0, f64::max);
        let bounds = self
            .variables
            .iter()
            .zip(values)
            .map(|(var, &x)| {
                let upper = var.upper_bound.unwrap_or(f64::INFINITY);
                (var.lower_bound - x).max(x - upper).max(0.0)
            })
            .fold(0.0, f64::max);
        rows.max(bounds)
    }

    /// Largest distance to the nearest integer over integer-typed variables.
    pub fn max_integrality_violation(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .filter(|(var, _)| var.is_integer())
            .map(|(_, x)| (x - x.round()).abs())
            .fold(0.0, f64::max)
    }

    /// Whether `values` satisfies every row, bound and integrality requirement.
    pub fn is_feasible_assignment(&self, values: &[f64]) -> bool {
        values.len() == self.variables.len()
            && SolutionQuality::measure(self, values).is_acceptable()
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    /// `None` when the backend does not expose the count.
    pub simplex_iterations: Option<u64>,
    /// `None` when the backend does not expose the count.
    pub nodes_explored: Option<u64>,
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
    pub num_binary_vars: u32,
}

impl SolverStatistics {
    /// Size counters for `problem`; timing and counts are filled by the adapter.
    pub fn for_problem(problem: &OptimizationProblem) -> Self {
        let count = |kind: VariableType| {
            problem
                .variables
                .iter()
                .filter(|v| v.variable_type == kind)
                .count() as u32
        };
        Self {
            simplex_iterations: None,
            nodes_explored: None,
            solve_time_ms: 0.0,
            num_variables: problem.num_variables() as u32,
            num_constraints: problem.constraints.len() as u32,
            num_integer_vars: count(VariableType::Integer),
            num_binary_vars: count(VariableType::Binary),
        }
    }
}

/// Quality metrics for the solution
#[derive(Debug, Clone, Default)]
pub struct SolutionQuality {
    pub max_constraint_violation: f64,
    pub max_integrality_violation: f64,
}

impl SolutionQuality {
    pub fn measure(problem: &OptimizationProblem, values: &[f64]) -> Self {
        Self {
            max_constraint_violation: problem.max_constraint_violation(values),
            max_integrality_violation: problem.max_integrality_violation(values),
        }
    }

    pub fn is_acceptable(&self) -> bool {
        self.max_constraint_violation <= FEASIBILITY_TOLERANCE
            && self.max_integrality_violation <= FEASIBILITY_TOLERANCE
    }
}

/// Solution to an optimization problem
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub optimal_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
    pub quality: SolutionQuality,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            optimal_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            optimal_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    /// Incumbent from a solve that stopped before proving optimality.
    pub fn feasible(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Feasible,
            optimal_value: Some(value),
            variable_values,
            message: "Feasible solution found, optimality not proven".to_string(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_quality(mut self, quality: SolutionQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    pub fn is_feasible(&self) -> bool {
        self.status.is_usable()
    }

    pub fn value(&self, var: VarId) -> Option<f64> {
        self.variable_values.get(var.index()).copied()
    }
}
