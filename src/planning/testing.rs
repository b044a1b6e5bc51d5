// Shared in-code datasets for unit tests.

use super::dataset::{
    CapacityLimit, CapacityMode, PlanningDataset, ProcessType, Product, Recipe, Resource,
    Scenario, ServiceLevel, UsageCap,
};

fn product(name: &str, revenue: f64, cost: f64, stockout: f64, holding: f64) -> Product {
    Product {
        stockout_cost: stockout,
        inventory_cost: holding,
        ..Product::new(name, revenue, cost)
    }
}

fn recipe(resource: usize, product: usize, process: ProcessType, batch: f64, cost: Option<f64>) -> Recipe {
    Recipe {
        resource,
        product,
        process,
        batch_size: batch,
        unit_cost: cost,
    }
}

/// Two bioreactors, two brands, two periods, two scenarios, bleed-feed on R1/A.
pub(crate) fn two_stage_dataset() -> PlanningDataset {
    let mut a = product("A", 10.0, 2.0, 5.0, 1.0);
    a.prior_inventory = 3.0;
    a.end_inventory_target = Some(4.0);
    let b = product("B", 8.0, 3.0, 4.0, 1.0);
    PlanningDataset {
        name: "two-stage".into(),
        resources: vec![Resource::new("R1"), Resource::new("R2")],
        products: vec![a, b],
        periods: vec!["P1".into(), "P2".into()],
        recipes: vec![
            recipe(0, 0, ProcessType::Standard, 10.0, None),
            recipe(0, 1, ProcessType::Standard, 6.0, Some(2.5)),
            recipe(1, 1, ProcessType::Standard, 8.0, None),
            recipe(0, 0, ProcessType::BleedFeed, 4.0, Some(1.0)),
        ],
        scenarios: vec![
            Scenario {
                name: "Low".into(),
                probability: 0.4,
                demand: vec![vec![5.0, 5.0], vec![2.0, 3.0]],
            },
            Scenario {
                name: "High".into(),
                probability: 0.6,
                demand: vec![vec![9.0, 12.0], vec![6.0, 6.0]],
            },
        ],
        usage_caps: vec![UsageCap {
            name: "Downstream".into(),
            coefficients: vec![1.0, 0.0],
            limit: 50.0,
        }],
        capacity_mode: CapacityMode::Exclusive,
        service_level: Some(ServiceLevel {
            probability_threshold: 0.5,
        }),
    }
}

/// One bioreactor pair planned against expected demand with utilization limits.
pub(crate) fn single_period_dataset() -> PlanningDataset {
    let mut r1 = Resource::new("R1");
    r1.capacity = Some(CapacityLimit {
        usage: vec![Some(1.0), Some(1.0)],
        limit: 1.0,
    });
    let mut r2 = Resource::new("R2");
    r2.capacity = Some(CapacityLimit {
        usage: vec![None, Some(1.0)],
        limit: 1.0,
    });
    PlanningDataset {
        name: "single-period".into(),
        resources: vec![r1, r2],
        products: vec![
            product("A", 10.0, 2.0, 5.0, 1.0),
            product("B", 8.0, 3.0, 4.0, 1.0),
        ],
        periods: vec!["P1".into()],
        recipes: vec![
            recipe(0, 0, ProcessType::Standard, 10.0, None),
            recipe(0, 1, ProcessType::Standard, 6.0, None),
            // R2 has no capacity usage for A, so this recipe never becomes a variable.
            recipe(1, 0, ProcessType::Standard, 7.0, None),
            recipe(1, 1, ProcessType::Standard, 8.0, None),
        ],
        scenarios: vec![Scenario {
            name: "expected".into(),
            probability: 1.0,
            demand: vec![vec![9.0], vec![7.0]],
        }],
        usage_caps: vec![UsageCap {
            name: "Delivery".into(),
            coefficients: vec![1.0, 1.0],
            limit: 100.0,
        }],
        capacity_mode: CapacityMode::Utilization,
        service_level: None,
    }
}
