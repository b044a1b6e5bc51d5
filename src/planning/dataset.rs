// Planning dataset.
//
// Immutable in-memory view of the bioreactors, brands, recipes, demand
// scenarios and economic parameters a production plan is formulated from.
// Entities refer to each other by position (`usize`) into the owning
// vectors of [`PlanningDataset`]; the loader guarantees those positions are
// valid.

use serde::Deserialize;
use std::fmt;

/// Production technology a recipe runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum ProcessType {
    /// Standard batch, usable in any period.
    #[serde(rename = "Std")]
    Standard,
    /// Bleed-feed extension, only in the recourse period and only on a
    /// bioreactor that ran a standard batch of the same brand in period 1.
    #[serde(rename = "BF")]
    BleedFeed,
}

impl ProcessType {
    pub const ALL: [ProcessType; 2] = [ProcessType::Standard, ProcessType::BleedFeed];

    pub fn code(self) -> &'static str {
        match self {
            ProcessType::Standard => "Std",
            ProcessType::BleedFeed => "BF",
        }
    }

    /// Whether the process may be scheduled before demand is observed.
    pub fn allowed_in_first_stage(self) -> bool {
        matches!(self, ProcessType::Standard)
    }

    /// Process that must have run in period 1 on the same (resource, product).
    pub fn first_stage_prerequisite(self) -> Option<ProcessType> {
        match self {
            ProcessType::Standard => None,
            ProcessType::BleedFeed => Some(ProcessType::Standard),
        }
    }
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Capacity usage of a bioreactor when capacity is a consumable quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityLimit {
    /// Usage coefficient per product position.
    pub usage: Vec<Option<f64>>,
    pub limit: f64,
}

/// A bioreactor.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    /// Present only for datasets in [`CapacityMode::Utilization`].
    pub capacity: Option<CapacityLimit>,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: None,
        }
    }

    pub fn capacity_usage(&self, product: usize) -> f64 {
        self.capacity
            .as_ref()
            .and_then(|c| c.usage.get(product).copied().flatten())
            .unwrap_or(0.0)
    }
}

/// A brand with its economics.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    pub revenue: f64,
    pub production_cost: f64,
    pub stockout_cost: f64,
    pub inventory_cost: f64,
    pub prior_inventory: f64,
    /// End-of-horizon inventory target used by the service level.
    pub end_inventory_target: Option<f64>,
    /// Upper bound on the stockout quantity in every period and scenario.
    pub stockout_limit: Option<f64>,
}

impl Product {
    pub fn new(name: impl Into<String>, revenue: f64, production_cost: f64) -> Self {
        Self {
            name: name.into(),
            revenue,
            production_cost,
            stockout_cost: 0.0,
            inventory_cost: 0.0,
            prior_inventory: 0.0,
            end_inventory_target: None,
            stockout_limit: None,
        }
    }
}

/// A feasible (resource, product, process) production option.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub resource: usize,
    pub product: usize,
    pub process: ProcessType,
    /// Batch yield of one run.
    pub batch_size: f64,
    /// Process-specific cost per unit; falls back to the product's cost.
    pub unit_cost: Option<f64>,
}

impl Recipe {
    pub fn cost_per_unit(&self, product: &Product) -> f64 {
        self.unit_cost.unwrap_or(product.production_cost)
    }

    /// Profit of one batch: (revenue - unit cost) x batch size.
    pub fn batch_margin(&self, product: &Product) -> f64 {
        (product.revenue - self.cost_per_unit(product)) * self.batch_size
    }
}

/// One realization of demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub probability: f64,
    /// `demand[product][period]`.
    pub demand: Vec<Vec<f64>>,
}

impl Scenario {
    pub fn demand(&self, product: usize, period: usize) -> f64 {
        self.demand
            .get(product)
            .and_then(|per_period| per_period.get(period))
            .copied()
            .unwrap_or(0.0)
    }
}

/// A downstream or delivery cap: Σ coefficient x produced quantity ≤ limit.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageCap {
    pub name: String,
    /// Coefficient per product position.
    pub coefficients: Vec<f64>,
    pub limit: f64,
}

impl UsageCap {
    pub fn coefficient(&self, product: usize) -> f64 {
        self.coefficients.get(product).copied().unwrap_or(0.0)
    }
}

/// How bioreactor capacity is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityMode {
    /// Each bioreactor runs exactly one recipe per period and scenario.
    Exclusive,
    /// Σ usage x assignment equals the bioreactor's limit.
    Utilization,
}

/// End-of-horizon service level requirement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceLevel {
    pub probability_threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanningDataset {
    pub name: String,
    pub resources: Vec<Resource>,
    pub products: Vec<Product>,
    /// One or two period names; the second one is the recourse period.
    pub periods: Vec<String>,
    pub recipes: Vec<Recipe>,
    pub scenarios: Vec<Scenario>,
    pub usage_caps: Vec<UsageCap>,
    pub capacity_mode: CapacityMode,
    pub service_level: Option<ServiceLevel>,
}

impl PlanningDataset {
    pub fn is_two_stage(&self) -> bool {
        self.periods.len() == 2
    }

    pub fn last_period(&self) -> usize {
        self.periods.len().saturating_sub(1)
    }

    pub fn recipe(&self, resource: usize, product: usize, process: ProcessType) -> Option<&Recipe> {
        self.recipes
            .iter()
            .find(|r| r.resource == resource && r.product == product && r.process == process)
    }

    pub fn recipes_for(&self, process: ProcessType) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter().filter(move |r| r.process == process)
    }

    pub fn product_index(&self, name: &str) -> Option<usize> {
        self.products.iter().position(|p| p.name == name)
    }

    pub fn resource_index(&self, name: &str) -> Option<usize> {
        self.resources.iter().position(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_cost_falls_back_to_product_cost() {
        let product = Product::new("A", 10.0, 4.0);
        let mut recipe = Recipe {
            resource: 0,
            product: 0,
            process: ProcessType::Standard,
            batch_size: 5.0,
            unit_cost: None,
        };
        assert_eq!(recipe.batch_margin(&product), 30.0);
        recipe.unit_cost = Some(6.0);
        assert_eq!(recipe.batch_margin(&product), 20.0);
    }

    #[test]
    fn bleed_feed_requires_standard_in_first_stage() {
        assert!(ProcessType::Standard.allowed_in_first_stage());
        assert!(!ProcessType::BleedFeed.allowed_in_first_stage());
        assert_eq!(
            ProcessType::BleedFeed.first_stage_prerequisite(),
            Some(ProcessType::Standard)
        );
        assert_eq!(ProcessType::Standard.first_stage_prerequisite(), None);
    }

    #[test]
    fn missing_capacity_usage_is_zero() {
        let mut resource = Resource::new("R1");
        assert_eq!(resource.capacity_usage(0), 0.0);
        resource.capacity = Some(CapacityLimit {
            usage: vec![Some(2.0), None],
            limit: 1.0,
        });
        assert_eq!(resource.capacity_usage(0), 2.0);
        assert_eq!(resource.capacity_usage(1), 0.0);
    }
}
