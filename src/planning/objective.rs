// Objective assembler: expected profit, to be maximized.

use super::dataset::{PlanningDataset, ProcessType};
use super::variables::DecisionVariables;
use crate::domain::{OptimizationProblem, Result, SolverError};

/// Set every objective coefficient.
///
/// - period-1 assignment: batch margin, unscaled (the variable is shared)
/// - period-2 assignment: batch margin x scenario probability
/// - stockout: -penalty x scenario probability
/// - inventory: -holding cost x scenario probability
///
/// Service indicators keep a zero coefficient.
pub fn assemble(
    dataset: &PlanningDataset,
    vars: &DecisionVariables,
    problem: &mut OptimizationProblem,
) -> Result<()> {
    let margin = |resource: usize, product: usize, process: ProcessType| {
        dataset
            .recipe(resource, product, process)
            .map(|recipe| recipe.batch_margin(&dataset.products[product]))
            .ok_or_else(|| {
                SolverError::InvalidProblem(format!(
                    "no recipe behind assignment of {} at {}",
                    dataset.products[product].name, dataset.resources[resource].name
                ))
            })
    };

    for (key, &id) in &vars.first_stage {
        problem.set_objective_coefficient(id, margin(key.resource, key.product, key.process)?)?;
    }

    for (key, &id) in &vars.recourse {
        let probability = dataset.scenarios[key.scenario].probability;
        let coefficient = margin(key.resource, key.product, key.process)? * probability;
        problem.set_objective_coefficient(id, coefficient)?;
    }

    for (key, &id) in &vars.stockout {
        let penalty = dataset.products[key.product].stockout_cost;
        let probability = dataset.scenarios[key.scenario].probability;
        problem.set_objective_coefficient(id, -penalty * probability)?;
    }

    for (key, &id) in &vars.inventory {
        let holding = dataset.products[key.product].inventory_cost;
        let probability = dataset.scenarios[key.scenario].probability;
        problem.set_objective_coefficient(id, -holding * probability)?;
    }

    Ok(())
}
