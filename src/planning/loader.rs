// Planning document loader.
//
// Parses the JSON planning document into raw records and validates them
// into a [`PlanningDataset`]. Every check runs before the formulation
// starts, so a bad document never produces a partial model.

use super::dataset::{
    CapacityLimit, CapacityMode, PlanningDataset, ProcessType, Product, Recipe, Resource,
    Scenario, ServiceLevel, UsageCap,
};
use super::error::ConfigError;
use crate::domain::SolverConfig;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Allowed deviation of the scenario probability mass from 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Name of the synthetic scenario a single-period dataset plans against.
pub const EXPECTED_SCENARIO: &str = "expected";

type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlanningDocument {
    #[serde(default)]
    name: String,
    resources: Vec<String>,
    products: Vec<ProductRecord>,
    periods: Vec<String>,
    /// process code -> resource -> product -> recipe
    recipes: BTreeMap<String, BTreeMap<String, BTreeMap<String, RecipeRecord>>>,
    #[serde(default)]
    capacity: Option<BTreeMap<String, CapacityRecord>>,
    scenarios: Vec<ScenarioRecord>,
    #[serde(default)]
    usage_caps: Vec<UsageCapRecord>,
    #[serde(default)]
    service_level: Option<ServiceLevelRecord>,
    #[serde(default)]
    solver: SolverConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProductRecord {
    name: String,
    revenue: f64,
    production_cost: f64,
    stockout_cost: f64,
    inventory_cost: f64,
    #[serde(default)]
    prior_inventory: f64,
    #[serde(default)]
    end_inventory: Option<f64>,
    #[serde(default)]
    stockout_limit: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeRecord {
    capacity: f64,
    #[serde(default)]
    cost: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CapacityRecord {
    usage: BTreeMap<String, Option<f64>>,
    limit: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DemandRecord {
    Constant(f64),
    PerPeriod(Vec<f64>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioRecord {
    name: String,
    probability: f64,
    demand: BTreeMap<String, DemandRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UsageCapRecord {
    name: String,
    coefficients: BTreeMap<String, f64>,
    limit: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServiceLevelRecord {
    probability_threshold: f64,
}

/// A validated dataset together with the solver settings it carries.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub dataset: PlanningDataset,
    pub solver: SolverConfig,
}

/// Read and validate a planning document from disk.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<LoadedDocument> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "loading planning document");
    load_from_str(&text)
}

/// Parse and validate a planning document held in memory.
pub fn load_from_str(text: &str) -> Result<LoadedDocument> {
    let document: PlanningDocument = serde_json::from_str(text)?;
    let solver = document.solver.clone();
    let dataset = build_dataset(document)?;
    debug!(
        resources = dataset.resources.len(),
        products = dataset.products.len(),
        periods = dataset.periods.len(),
        recipes = dataset.recipes.len(),
        scenarios = dataset.scenarios.len(),
        "planning document validated"
    );
    Ok(LoadedDocument { dataset, solver })
}

fn check_unique<'a>(kind: &'static str, names: impl IntoIterator<Item = &'a String>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(ConfigError::invalid(kind, "names must not be empty"));
        }
        if !seen.insert(name) {
            return Err(ConfigError::Duplicate {
                kind,
                name: name.clone(),
            });
        }
    }
    Ok(())
}

fn lookup(names: &[String], kind: &'static str, name: &str, context: &str) -> Result<usize> {
    names
        .iter()
        .position(|n| n == name)
        .ok_or_else(|| ConfigError::UnknownReference {
            kind,
            name: name.to_string(),
            context: context.to_string(),
        })
}

fn non_negative(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(
            field,
            format!("expected a finite non-negative number, got {value}"),
        ))
    }
}

fn parse_process(code: &str) -> Result<ProcessType> {
    ProcessType::ALL
        .into_iter()
        .find(|p| p.code() == code)
        .ok_or_else(|| ConfigError::UnknownReference {
            kind: "process type",
            name: code.to_string(),
            context: "recipes".to_string(),
        })
}

fn build_dataset(doc: PlanningDocument) -> Result<PlanningDataset> {
    if doc.resources.is_empty() {
        return Err(ConfigError::Missing("resources".into()));
    }
    if doc.products.is_empty() {
        return Err(ConfigError::Missing("products".into()));
    }
    if doc.scenarios.is_empty() {
        return Err(ConfigError::Missing("scenarios".into()));
    }
    if doc.periods.is_empty() || doc.periods.len() > 2 {
        return Err(ConfigError::invalid(
            "periods",
            format!("expected one or two periods, got {}", doc.periods.len()),
        ));
    }
    check_unique("resource", &doc.resources)?;
    check_unique("product", doc.products.iter().map(|p| &p.name))?;
    check_unique("period", &doc.periods)?;
    check_unique("scenario", doc.scenarios.iter().map(|s| &s.name))?;
    check_unique("usage cap", doc.usage_caps.iter().map(|c| &c.name))?;

    let product_names: Vec<String> = doc.products.iter().map(|p| p.name.clone()).collect();
    let num_periods = doc.periods.len();

    let products = doc
        .products
        .into_iter()
        .map(build_product)
        .collect::<Result<Vec<_>>>()?;

    let mut resources: Vec<Resource> = doc.resources.iter().map(Resource::new).collect();
    let capacity_mode = match doc.capacity {
        None => CapacityMode::Exclusive,
        Some(table) => {
            for (resource_name, record) in table {
                let r = lookup(&doc.resources, "resource", &resource_name, "capacity")?;
                let mut usage = vec![None; product_names.len()];
                for (product_name, coefficient) in record.usage {
                    let context = format!("capacity of {resource_name}");
                    let p = lookup(&product_names, "product", &product_name, &context)?;
                    usage[p] = coefficient;
                }
                resources[r].capacity = Some(CapacityLimit {
                    usage,
                    limit: record.limit,
                });
            }
            if let Some(missing) = resources.iter().find(|r| r.capacity.is_none()) {
                return Err(ConfigError::Missing(format!(
                    "capacity entry for resource '{}'",
                    missing.name
                )));
            }
            CapacityMode::Utilization
        }
    };

    let mut recipes = Vec::new();
    for (code, by_resource) in doc.recipes {
        let process = parse_process(&code)?;
        if !process.allowed_in_first_stage() && num_periods < 2 {
            return Err(ConfigError::invalid(
                "recipes",
                format!("process '{code}' requires a recourse period"),
            ));
        }
        for (resource_name, by_product) in by_resource {
            let context = format!("recipes.{code}");
            let resource = lookup(&doc.resources, "resource", &resource_name, &context)?;
            for (product_name, record) in by_product {
                let product = lookup(&product_names, "product", &product_name, &context)?;
                if !(record.capacity.is_finite() && record.capacity > 0.0) {
                    return Err(ConfigError::invalid(
                        format!("recipes.{code}.{resource_name}.{product_name}.capacity"),
                        "batch size must be positive",
                    ));
                }
                recipes.push(Recipe {
                    resource,
                    product,
                    process,
                    batch_size: record.capacity,
                    unit_cost: record.cost,
                });
            }
        }
    }
    if recipes.is_empty() {
        return Err(ConfigError::Missing("recipes".into()));
    }
    recipes.sort_by_key(|r| (r.process, r.resource, r.product));

    let mut scenarios = doc
        .scenarios
        .into_iter()
        .map(|record| build_scenario(record, &product_names, num_periods))
        .collect::<Result<Vec<_>>>()?;
    let mass: f64 = scenarios.iter().map(|s| s.probability).sum();
    if (mass - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(ConfigError::ProbabilityMass(mass));
    }
    if num_periods == 1 {
        scenarios = vec![expected_scenario(&scenarios, product_names.len())];
    }

    let usage_caps = doc
        .usage_caps
        .into_iter()
        .map(|record| {
            let mut coefficients = vec![0.0; product_names.len()];
            for (product_name, coefficient) in record.coefficients {
                let context = format!("usage cap {}", record.name);
                let p = lookup(&product_names, "product", &product_name, &context)?;
                coefficients[p] = coefficient;
            }
            Ok(UsageCap {
                name: record.name,
                coefficients,
                limit: record.limit,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let service_level = match doc.service_level {
        None => None,
        Some(record) => {
            let threshold = record.probability_threshold;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::invalid(
                    "service_level.probability_threshold",
                    format!("{threshold} is not a probability"),
                ));
            }
            if products.iter().all(|p| p.end_inventory_target.is_none()) {
                return Err(ConfigError::Missing(
                    "end_inventory target for at least one product".into(),
                ));
            }
            Some(ServiceLevel {
                probability_threshold: threshold,
            })
        }
    };

    Ok(PlanningDataset {
        name: doc.name,
        resources,
        products,
        periods: doc.periods,
        recipes,
        scenarios,
        usage_caps,
        capacity_mode,
        service_level,
    })
}

fn build_product(record: ProductRecord) -> Result<Product> {
    let field = |suffix: &str| format!("products.{}.{}", record.name, suffix);
    Ok(Product {
        revenue: record.revenue,
        production_cost: record.production_cost,
        stockout_cost: record.stockout_cost,
        inventory_cost: record.inventory_cost,
        prior_inventory: non_negative(&field("prior_inventory"), record.prior_inventory)?,
        end_inventory_target: record
            .end_inventory
            .map(|v| non_negative(&field("end_inventory"), v))
            .transpose()?,
        stockout_limit: record
            .stockout_limit
            .map(|v| non_negative(&field("stockout_limit"), v))
            .transpose()?,
        name: record.name,
    })
}

fn build_scenario(
    record: ScenarioRecord,
    product_names: &[String],
    num_periods: usize,
) -> Result<Scenario> {
    if !(0.0..=1.0).contains(&record.probability) {
        return Err(ConfigError::invalid(
            format!("scenarios.{}.probability", record.name),
            format!("{} is not a probability", record.probability),
        ));
    }
    let mut demand: Vec<Option<Vec<f64>>> = vec![None; product_names.len()];
    for (product_name, entry) in record.demand {
        let context = format!("demand of scenario {}", record.name);
        let p = lookup(product_names, "product", &product_name, &context)?;
        let per_period = match entry {
            DemandRecord::Constant(q) => vec![q; num_periods],
            DemandRecord::PerPeriod(values) if values.len() == num_periods => values,
            DemandRecord::PerPeriod(values) => {
                return Err(ConfigError::invalid(
                    format!("scenarios.{}.demand.{}", record.name, product_name),
                    format!("expected {num_periods} periods, got {}", values.len()),
                ))
            }
        };
        demand[p] = Some(per_period);
    }
    let demand = demand
        .into_iter()
        .zip(product_names)
        .map(|(entry, name)| {
            entry.ok_or_else(|| {
                ConfigError::Missing(format!("demand for '{}' in scenario '{}'", name, record.name))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Scenario {
        name: record.name,
        probability: record.probability,
        demand,
    })
}

/// Probability-weighted mean demand as a single certain scenario.
fn expected_scenario(scenarios: &[Scenario], num_products: usize) -> Scenario {
    let demand = (0..num_products)
        .map(|p| vec![scenarios.iter().map(|s| s.probability * s.demand(p, 0)).sum()])
        .collect();
    Scenario {
        name: EXPECTED_SCENARIO.to_string(),
        probability: 1.0,
        demand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SolverBackend;

    const TWO_STAGE: &str = r#"{
        "name": "two-stage",
        "resources": ["R1", "R2"],
        "products": [
            {"name": "A", "revenue": 10, "production_cost": 2, "stockout_cost": 5,
             "inventory_cost": 1, "prior_inventory": 3, "end_inventory": 4},
            {"name": "B", "revenue": 8, "production_cost": 3, "stockout_cost": 4,
             "inventory_cost": 1}
        ],
        "periods": ["P1", "P2"],
        "recipes": {
            "Std": {"R1": {"A": {"capacity": 10}, "B": {"capacity": 6, "cost": 2.5}},
                    "R2": {"B": {"capacity": 8}}},
            "BF": {"R1": {"A": {"capacity": 4, "cost": 1}}}
        },
        "scenarios": [
            {"name": "Low", "probability": 0.4, "demand": {"A": 5, "B": [2, 3]}},
            {"name": "High", "probability": 0.6, "demand": {"A": [9, 12], "B": 6}}
        ],
        "usage_caps": [{"name": "Downstream", "coefficients": {"A": 1}, "limit": 50}],
        "service_level": {"probability_threshold": 0.5},
        "solver": {"backend": "highs", "time_limit": 30}
    }"#;

    #[test]
    fn loads_two_stage_document() {
        let loaded = load_from_str(TWO_STAGE).unwrap();
        let ds = &loaded.dataset;
        assert!(ds.is_two_stage());
        assert_eq!(ds.capacity_mode, CapacityMode::Exclusive);
        assert_eq!(ds.recipes.len(), 4);
        assert_eq!(ds.recipes[0].process, ProcessType::Standard);
        assert_eq!(ds.recipes.last().unwrap().process, ProcessType::BleedFeed);
        assert_eq!(ds.scenarios[0].demand, vec![vec![5.0, 5.0], vec![2.0, 3.0]]);
        assert_eq!(ds.usage_caps[0].coefficients, vec![1.0, 0.0]);
        assert_eq!(ds.products[0].end_inventory_target, Some(4.0));
        assert_eq!(loaded.solver.backend, SolverBackend::Highs);
        assert_eq!(loaded.solver.time_limit, Some(30.0));
    }

    #[test]
    fn single_period_collapses_to_expected_demand() {
        let doc = r#"{
            "resources": ["R1"],
            "products": [{"name": "A", "revenue": 1, "production_cost": 0,
                          "stockout_cost": 0, "inventory_cost": 0}],
            "periods": ["P1"],
            "recipes": {"Std": {"R1": {"A": {"capacity": 1}}}},
            "capacity": {"R1": {"usage": {"A": 1}, "limit": 1}},
            "scenarios": [
                {"name": "lo", "probability": 0.25, "demand": {"A": 4}},
                {"name": "hi", "probability": 0.75, "demand": {"A": 8}}
            ]
        }"#;
        let ds = load_from_str(doc).unwrap().dataset;
        assert_eq!(ds.capacity_mode, CapacityMode::Utilization);
        assert_eq!(ds.scenarios.len(), 1);
        assert_eq!(ds.scenarios[0].name, EXPECTED_SCENARIO);
        assert_eq!(ds.scenarios[0].probability, 1.0);
        assert_eq!(ds.scenarios[0].demand(0, 0), 7.0);
    }

    #[test]
    fn rejects_probability_mass_not_one() {
        let doc = TWO_STAGE.replace("\"probability\": 0.6", "\"probability\": 0.5");
        assert!(matches!(
            load_from_str(&doc),
            Err(ConfigError::ProbabilityMass(_))
        ));
    }

    #[test]
    fn rejects_unknown_product_in_recipes() {
        let doc = TWO_STAGE.replace("\"R2\": {\"B\"", "\"R2\": {\"Z\"");
        assert!(matches!(
            load_from_str(&doc),
            Err(ConfigError::UnknownReference { kind: "product", .. })
        ));
    }

    #[test]
    fn rejects_missing_demand_entry() {
        let doc = TWO_STAGE.replace("\"demand\": {\"A\": 5, \"B\": [2, 3]}", "\"demand\": {\"A\": 5}");
        assert!(matches!(load_from_str(&doc), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn rejects_wrong_demand_length() {
        let doc = TWO_STAGE.replace("[2, 3]", "[2, 3, 4]");
        assert!(matches!(load_from_str(&doc), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_more_than_two_periods() {
        let doc = TWO_STAGE.replace("[\"P1\", \"P2\"]", "[\"P1\", \"P2\", \"P3\"]");
        assert!(matches!(load_from_str(&doc), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_missing_required_field() {
        let doc = TWO_STAGE.replace("\"periods\": [\"P1\", \"P2\"],", "");
        assert!(matches!(load_from_str(&doc), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_service_level_without_targets() {
        let doc = TWO_STAGE.replace(", \"end_inventory\": 4", "");
        assert!(matches!(load_from_str(&doc), Err(ConfigError::Missing(_))));
    }
}
