// Index builder.
//
// Enumerates the tuples that admit a decision variable. Only recipes that
// exist produce assignment tuples; everything else is simply absent.

use super::dataset::{CapacityMode, PlanningDataset, ProcessType, Recipe};

/// Period-1 assignment: shared by every scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirstStageKey {
    pub resource: usize,
    pub product: usize,
    pub process: ProcessType,
}

/// Period-2 assignment: one copy per scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecourseKey {
    pub resource: usize,
    pub product: usize,
    pub process: ProcessType,
    pub scenario: usize,
}

impl RecourseKey {
    /// The period-1 tuple this recourse assignment depends on, if any.
    pub fn prerequisite(&self) -> Option<FirstStageKey> {
        self.process
            .first_stage_prerequisite()
            .map(|process| FirstStageKey {
                resource: self.resource,
                product: self.product,
                process,
            })
    }
}

/// Stockout and inventory tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BalanceKey {
    pub period: usize,
    pub scenario: usize,
    pub product: usize,
}

/// Valid tuples of every variable family.
#[derive(Debug, Clone, Default)]
pub struct IndexSets {
    pub first_stage: Vec<FirstStageKey>,
    pub recourse: Vec<RecourseKey>,
    pub balance: Vec<BalanceKey>,
    /// Scenarios that carry a service indicator.
    pub service: Vec<usize>,
}

impl IndexSets {
    pub fn build(dataset: &PlanningDataset) -> Self {
        let constructible = |recipe: &&Recipe| match dataset.capacity_mode {
            CapacityMode::Exclusive => true,
            CapacityMode::Utilization => dataset.resources[recipe.resource]
                .capacity
                .as_ref()
                .and_then(|c| c.usage.get(recipe.product).copied().flatten())
                .is_some(),
        };

        let first_stage: Vec<FirstStageKey> = dataset
            .recipes
            .iter()
            .filter(|r| r.process.allowed_in_first_stage())
            .filter(constructible)
            .map(|r| FirstStageKey {
                resource: r.resource,
                product: r.product,
                process: r.process,
            })
            .collect();

        let mut recourse = Vec::new();
        if dataset.is_two_stage() {
            for scenario in 0..dataset.scenarios.len() {
                for recipe in dataset.recipes.iter().filter(constructible) {
                    let key = RecourseKey {
                        resource: recipe.resource,
                        product: recipe.product,
                        process: recipe.process,
                        scenario,
                    };
                    // A recourse process whose prerequisite can never run is unusable.
                    if let Some(required) = key.prerequisite() {
                        if !first_stage.contains(&required) {
                            continue;
                        }
                    }
                    recourse.push(key);
                }
            }
        }

        let mut balance = Vec::new();
        for period in 0..dataset.periods.len() {
            for scenario in 0..dataset.scenarios.len() {
                for product in 0..dataset.products.len() {
                    balance.push(BalanceKey {
                        period,
                        scenario,
                        product,
                    });
                }
            }
        }

        let service = if dataset.service_level.is_some() {
            (0..dataset.scenarios.len()).collect()
        } else {
            Vec::new()
        };

        Self {
            first_stage,
            recourse,
            balance,
            service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::testing::two_stage_dataset;

    #[test]
    fn first_stage_uses_only_standard_recipes_without_scenarios() {
        let ds = two_stage_dataset();
        let idx = IndexSets::build(&ds);
        let standard = ds.recipes_for(ProcessType::Standard).count();
        assert_eq!(idx.first_stage.len(), standard);
        assert!(idx
            .first_stage
            .iter()
            .all(|k| k.process == ProcessType::Standard));
    }

    #[test]
    fn recourse_is_recipe_by_scenario_cross_product() {
        let ds = two_stage_dataset();
        let idx = IndexSets::build(&ds);
        assert_eq!(idx.recourse.len(), ds.recipes.len() * ds.scenarios.len());
        for scenario in 0..ds.scenarios.len() {
            let bf = idx
                .recourse
                .iter()
                .filter(|k| k.scenario == scenario && k.process == ProcessType::BleedFeed)
                .count();
            assert_eq!(bf, ds.recipes_for(ProcessType::BleedFeed).count());
        }
    }

    #[test]
    fn unsupported_pairs_are_absent() {
        let ds = two_stage_dataset();
        let idx = IndexSets::build(&ds);
        let r2 = ds.resource_index("R2").unwrap();
        let a = ds.product_index("A").unwrap();
        assert!(!idx
            .first_stage
            .iter()
            .any(|k| k.resource == r2 && k.product == a));
    }

    #[test]
    fn bleed_feed_without_standard_prerequisite_is_dropped() {
        let mut ds = two_stage_dataset();
        let r2 = ds.resource_index("R2").unwrap();
        let a = ds.product_index("A").unwrap();
        ds.recipes.push(Recipe {
            resource: r2,
            product: a,
            process: ProcessType::BleedFeed,
            batch_size: 3.0,
            unit_cost: None,
        });
        let idx = IndexSets::build(&ds);
        assert!(!idx
            .recourse
            .iter()
            .any(|k| k.resource == r2 && k.product == a));
    }

    #[test]
    fn balance_covers_every_period_scenario_and_product() {
        let ds = two_stage_dataset();
        let idx = IndexSets::build(&ds);
        assert_eq!(
            idx.balance.len(),
            ds.periods.len() * ds.scenarios.len() * ds.products.len()
        );
        assert_eq!(idx.service.len(), ds.scenarios.len());
    }
}
