use super::constraints::{ConstraintBuilder, ConstraintCounts};
use super::dataset::PlanningDataset;
use super::index::IndexSets;
use super::objective;
use super::variables::DecisionVariables;
use crate::domain::{OptimizationProblem, OptimizationType, Result, SolverConfig};
use tracing::info;

/// A fully formulated production-planning MIP.
///
/// Built in one pass: index sets, then variables, then constraints and the
/// objective. Read-only afterwards.
#[derive(Debug, Clone)]
pub struct Formulation {
    pub problem: OptimizationProblem,
    pub vars: DecisionVariables,
    pub counts: ConstraintCounts,
    pub two_stage: bool,
}

impl Formulation {
    pub fn build(dataset: &PlanningDataset, config: SolverConfig) -> Result<Self> {
        let mut problem = OptimizationProblem::new(OptimizationType::Maximize)
            .with_name(dataset.name.clone())
            .with_description(if dataset.is_two_stage() {
                "two-stage bioreactor schedule under demand scenarios"
            } else {
                "single-period bioreactor schedule"
            })
            .with_config(config);

        let index = IndexSets::build(dataset);
        let vars = DecisionVariables::create(dataset, &index, &mut problem)?;
        let counts = ConstraintBuilder::new(dataset, &vars, &mut problem).build_all()?;
        objective::assemble(dataset, &vars, &mut problem)?;

        info!(
            model = %problem.name,
            variables = problem.num_variables(),
            assignments = vars.assignment_count(),
            constraints = counts.total(),
            "model formulated"
        );

        Ok(Self {
            problem,
            vars,
            counts,
            two_stage: dataset.is_two_stage(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::testing::{single_period_dataset, two_stage_dataset};

    #[test]
    fn formulation_is_deterministic() {
        let ds = two_stage_dataset();
        let a = Formulation::build(&ds, SolverConfig::default()).unwrap();
        let b = Formulation::build(&ds, SolverConfig::default()).unwrap();
        let names = |f: &Formulation| {
            f.problem
                .variables
                .iter()
                .map(|v| v.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&a), names(&b));
        assert_eq!(a.problem.objective.coefficients, b.problem.objective.coefficients);
        let rows = |f: &Formulation| {
            f.problem
                .constraints
                .iter()
                .map(|c| (c.name.clone(), c.terms.clone(), c.bound))
                .collect::<Vec<_>>()
        };
        assert_eq!(rows(&a), rows(&b));
    }

    #[test]
    fn problem_sense_is_maximize() {
        let f = Formulation::build(&single_period_dataset(), SolverConfig::default()).unwrap();
        assert_eq!(f.problem.objective.optimization_type, OptimizationType::Maximize);
        assert!(!f.two_stage);
        assert!(f.problem.is_mixed_integer());
    }
}
