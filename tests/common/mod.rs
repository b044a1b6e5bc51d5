#![allow(dead_code)]

use bioplan::planning::{load_from_str, LoadedDocument};

/// Two resources, two products, one period. R1 should make A and R2 should
/// make B: (10-2)x100 + (8-1)x60 = 1220 with demand met exactly. The
/// harvest cap never binds.
pub const ASSIGNMENT: &str = r#"{
    "name": "assignment",
    "resources": ["R1", "R2"],
    "products": [
        {"name": "A", "revenue": 10, "production_cost": 0, "stockout_cost": 1, "inventory_cost": 1},
        {"name": "B", "revenue": 8, "production_cost": 0, "stockout_cost": 1, "inventory_cost": 1}
    ],
    "periods": ["P1"],
    "recipes": {
        "Std": {
            "R1": {"A": {"capacity": 100, "cost": 2}, "B": {"capacity": 50, "cost": 3}},
            "R2": {"A": {"capacity": 20, "cost": 4}, "B": {"capacity": 60, "cost": 1}}
        }
    },
    "scenarios": [{"name": "base", "probability": 1, "demand": {"A": 100, "B": 60}}],
    "usage_caps": [{"name": "Harvest", "coefficients": {"A": 1, "B": 1}, "limit": 1000}]
}"#;

/// One resource that cannot cover demand, with shortfall forbidden.
pub const SHORTFALL_FORBIDDEN: &str = r#"{
    "name": "shortfall",
    "resources": ["R1"],
    "products": [
        {"name": "A", "revenue": 10, "production_cost": 2, "stockout_cost": 5,
         "inventory_cost": 1, "stockout_limit": 0}
    ],
    "periods": ["P1"],
    "recipes": {"Std": {"R1": {"A": {"capacity": 100}}}},
    "scenarios": [{"name": "base", "probability": 1, "demand": {"A": 1000}}]
}"#;

pub const TWO_STAGE: &str = r#"{
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
    "solver": {"backend": "highs"}
}"#;

/// Single period in utilization mode; R2 has no usage entry for A.
pub const UTILIZATION: &str = r#"{
    "name": "utilization",
    "resources": ["R1", "R2"],
    "products": [
        {"name": "A", "revenue": 10, "production_cost": 2, "stockout_cost": 5, "inventory_cost": 1},
        {"name": "B", "revenue": 8, "production_cost": 3, "stockout_cost": 4, "inventory_cost": 1}
    ],
    "periods": ["P1"],
    "recipes": {
        "Std": {
            "R1": {"A": {"capacity": 10}, "B": {"capacity": 6}},
            "R2": {"A": {"capacity": 7}, "B": {"capacity": 8}}
        }
    },
    "capacity": {
        "R1": {"usage": {"A": 0.5, "B": 0.5}, "limit": 1},
        "R2": {"usage": {"A": null, "B": 1}, "limit": 1}
    },
    "scenarios": [
        {"name": "lo", "probability": 0.5, "demand": {"A": 8, "B": 6}},
        {"name": "hi", "probability": 0.5, "demand": {"A": 10, "B": 8}}
    ]
}"#;

pub fn load(text: &str) -> LoadedDocument {
    bioplan::logging::init_test();
    load_from_str(text).expect("fixture should load")
}
