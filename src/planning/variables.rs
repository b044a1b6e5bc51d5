// Variable factory: one registered variable per valid index tuple.

use super::dataset::PlanningDataset;
use super::index::{BalanceKey, FirstStageKey, IndexSets, RecourseKey};
use crate::domain::{OptimizationProblem, Result, VarId, Variable};
use std::collections::BTreeMap;

/// Handles of every decision variable, keyed by their tuple.
///
/// Period-1 and period-2 assignments live in separate maps; a period-1
/// handle is the same variable in every scenario's constraints.
#[derive(Debug, Clone, Default)]
pub struct DecisionVariables {
    pub first_stage: BTreeMap<FirstStageKey, VarId>,
    pub recourse: BTreeMap<RecourseKey, VarId>,
    pub stockout: BTreeMap<BalanceKey, VarId>,
    pub inventory: BTreeMap<BalanceKey, VarId>,
    /// End-inventory-met indicator per scenario.
    pub service: BTreeMap<usize, VarId>,
}

impl DecisionVariables {
    pub fn create(
        dataset: &PlanningDataset,
        index: &IndexSets,
        problem: &mut OptimizationProblem,
    ) -> Result<Self> {
        let mut vars = DecisionVariables::default();
        let names = VariableNames { dataset };

        for key in &index.first_stage {
            let id = problem.add_variable(Variable::binary(names.first_stage(key)))?;
            vars.first_stage.insert(*key, id);
        }

        for key in &index.recourse {
            let id = problem.add_variable(Variable::binary(names.recourse(key)))?;
            vars.recourse.insert(*key, id);
        }

        for key in &index.balance {
            let limit = dataset.products[key.product].stockout_limit;
            let stockout = Variable::continuous(names.balance("stockout", key)).with_bounds(0.0, limit);
            vars.stockout.insert(*key, problem.add_variable(stockout)?);
        }

        for key in &index.balance {
            let id = problem.add_variable(Variable::continuous(names.balance("inventory", key)))?;
            vars.inventory.insert(*key, id);
        }

        for &scenario in &index.service {
            let name = format!("end inventory met if {}", dataset.scenarios[scenario].name);
            vars.service.insert(scenario, problem.add_variable(Variable::binary(name))?);
        }

        Ok(vars)
    }

    pub fn assignment_count(&self) -> usize {
        self.first_stage.len() + self.recourse.len()
    }
}

/// Deterministic names that spell out the whole tuple.
struct VariableNames<'a> {
    dataset: &'a PlanningDataset,
}

impl VariableNames<'_> {
    fn first_stage(&self, key: &FirstStageKey) -> String {
        format!(
            "produce {} at {} using {} on {}",
            self.dataset.products[key.product].name,
            self.dataset.resources[key.resource].name,
            key.process,
            self.dataset.periods[0],
        )
    }

    fn recourse(&self, key: &RecourseKey) -> String {
        format!(
            "produce {} at {} using {} on {} if {}",
            self.dataset.products[key.product].name,
            self.dataset.resources[key.resource].name,
            key.process,
            self.dataset.periods[1],
            self.dataset.scenarios[key.scenario].name,
        )
    }

    fn balance(&self, family: &str, key: &BalanceKey) -> String {
        format!(
            "{} of {} on {} if {}",
            family,
            self.dataset.products[key.product].name,
            self.dataset.periods[key.period],
            self.dataset.scenarios[key.scenario].name,
        )
    }
}
