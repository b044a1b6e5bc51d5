// Constraint builder.
//
// Emits every constraint family over the registered decision variables.
// Period index 0 is the first stage; index 1, when present, is the
// recourse period and is always instantiated per scenario.

use super::dataset::{CapacityMode, PlanningDataset, ProcessType};
use super::variables::DecisionVariables;
use super::index::BalanceKey;
use crate::domain::{
    Constraint, ConstraintType, OptimizationProblem, Result, SolverError, VarId,
};
use tracing::{debug, warn};

/// Number of rows emitted per family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintCounts {
    pub capacity: usize,
    pub material_balance: usize,
    pub usage_caps: usize,
    pub stage_linking: usize,
    pub service_linkage: usize,
    pub service_threshold: usize,
}

impl ConstraintCounts {
    pub fn total(&self) -> usize {
        self.capacity
            + self.material_balance
            + self.usage_caps
            + self.stage_linking
            + self.service_linkage
            + self.service_threshold
    }
}

pub struct ConstraintBuilder<'a> {
    dataset: &'a PlanningDataset,
    vars: &'a DecisionVariables,
    problem: &'a mut OptimizationProblem,
}

impl<'a> ConstraintBuilder<'a> {
    pub fn new(
        dataset: &'a PlanningDataset,
        vars: &'a DecisionVariables,
        problem: &'a mut OptimizationProblem,
    ) -> Self {
        Self {
            dataset,
            vars,
            problem,
        }
    }

    pub fn build_all(mut self) -> Result<ConstraintCounts> {
        let counts = ConstraintCounts {
            capacity: self.capacity()?,
            material_balance: self.material_balance()?,
            usage_caps: self.usage_caps()?,
            stage_linking: self.stage_linking()?,
            service_linkage: self.service_linkage()?,
            service_threshold: self.service_threshold()?,
        };
        debug!(?counts, "constraints emitted");
        Ok(counts)
    }

    fn add(
        &mut self,
        name: String,
        constraint_type: ConstraintType,
        terms: Vec<(VarId, f64)>,
        bound: f64,
    ) -> Result<()> {
        self.problem
            .add_constraint(Constraint::new(constraint_type, terms, bound).with_name(name))?;
        Ok(())
    }

    fn batch_size(&self, resource: usize, product: usize, process: ProcessType) -> Result<f64> {
        self.dataset
            .recipe(resource, product, process)
            .map(|r| r.batch_size)
            .ok_or_else(|| {
                SolverError::InvalidProblem(format!(
                    "no recipe for {} at {} using {}",
                    self.dataset.products[product].name,
                    self.dataset.resources[resource].name,
                    process
                ))
            })
    }

    fn period_name(&self, period: usize) -> &'a str {
        &self.dataset.periods[period]
    }

    fn scenario_name(&self, scenario: usize) -> &'a str {
        &self.dataset.scenarios[scenario].name
    }

    /// Coefficient of an assignment in its bioreactor's capacity row.
    fn capacity_coefficient(&self, resource: usize, product: usize) -> f64 {
        match self.dataset.capacity_mode {
            CapacityMode::Exclusive => 1.0,
            CapacityMode::Utilization => self.dataset.resources[resource].capacity_usage(product),
        }
    }

    /// Right-hand side of a bioreactor's capacity row.
    fn capacity_bound(&self, resource: usize) -> f64 {
        match self.dataset.capacity_mode {
            CapacityMode::Exclusive => 1.0,
            CapacityMode::Utilization => self.dataset.resources[resource]
                .capacity
                .as_ref()
                .map_or(0.0, |c| c.limit),
        }
    }

    /// One row per (resource, period[, scenario]).
    fn capacity(&mut self) -> Result<usize> {
        let mut rows = 0;
        for resource in 0..self.dataset.resources.len() {
            let res_name = self.dataset.resources[resource].name.clone();
            let terms: Vec<(VarId, f64)> = self
                .vars
                .first_stage
                .iter()
                .filter(|(k, _)| k.resource == resource)
                .map(|(k, &id)| (id, self.capacity_coefficient(resource, k.product)))
                .collect();
            if terms.is_empty() {
                warn!(resource = %res_name, period = self.period_name(0), "bioreactor has no usable recipe");
            }
            let name = format!("capacity of {} on {}", res_name, self.period_name(0));
            self.add(name, ConstraintType::Equal, terms, self.capacity_bound(resource))?;
            rows += 1;

            if !self.dataset.is_two_stage() {
                continue;
            }
            for scenario in 0..self.dataset.scenarios.len() {
                let terms: Vec<(VarId, f64)> = self
                    .vars
                    .recourse
                    .iter()
                    .filter(|(k, _)| k.resource == resource && k.scenario == scenario)
                    .map(|(k, &id)| (id, self.capacity_coefficient(resource, k.product)))
                    .collect();
                let name = format!(
                    "capacity of {} on {} if {}",
                    res_name,
                    self.period_name(1),
                    self.scenario_name(scenario)
                );
                self.add(name, ConstraintType::Equal, terms, self.capacity_bound(resource))?;
                rows += 1;
            }
        }
        Ok(rows)
    }

    /// production + stockout + carried inventory - new inventory = demand.
    fn material_balance(&mut self) -> Result<usize> {
        let mut rows = 0;
        for period in 0..self.dataset.periods.len() {
            for scenario in 0..self.dataset.scenarios.len() {
                for product in 0..self.dataset.products.len() {
                    let mut terms = self.production_terms(period, scenario, product, |_| 1.0)?;
                    let key = BalanceKey {
                        period,
                        scenario,
                        product,
                    };
                    terms.push((self.vars.stockout[&key], 1.0));
                    terms.push((self.vars.inventory[&key], -1.0));

                    let demand = self.dataset.scenarios[scenario].demand(product, period);
                    let rhs = if period == 0 {
                        demand - self.dataset.products[product].prior_inventory
                    } else {
                        // Each scenario carries its own period-1 ending inventory.
                        let carried = BalanceKey {
                            period: period - 1,
                            ..key
                        };
                        terms.push((self.vars.inventory[&carried], 1.0));
                        demand
                    };

                    let name = format!(
                        "balance of {} on {} if {}",
                        self.dataset.products[product].name,
                        self.period_name(period),
                        self.scenario_name(scenario)
                    );
                    self.add(name, ConstraintType::Equal, terms, rhs)?;
                    rows += 1;
                }
            }
        }
        Ok(rows)
    }

    /// Produced quantity terms (assignment x batch size x `weight(product)`)
    /// feeding `product` in `period` under `scenario`.
    fn production_terms(
        &self,
        period: usize,
        scenario: usize,
        product: usize,
        weight: impl Fn(usize) -> f64,
    ) -> Result<Vec<(VarId, f64)>> {
        let mut terms = Vec::new();
        if period == 0 {
            for (k, &id) in self.vars.first_stage.iter().filter(|(k, _)| k.product == product) {
                let w = weight(k.product);
                if w != 0.0 {
                    terms.push((id, self.batch_size(k.resource, k.product, k.process)? * w));
                }
            }
        } else {
            for (k, &id) in self
                .vars
                .recourse
                .iter()
                .filter(|(k, _)| k.product == product && k.scenario == scenario)
            {
                let w = weight(k.product);
                if w != 0.0 {
                    terms.push((id, self.batch_size(k.resource, k.product, k.process)? * w));
                }
            }
        }
        Ok(terms)
    }

    /// Σ usage coefficient x produced quantity ≤ limit, per period and, in
    /// the recourse period, per scenario.
    fn usage_caps(&mut self) -> Result<usize> {
        let mut rows = 0;
        let dataset = self.dataset;
        for cap in &dataset.usage_caps {
            let weight = |product: usize| cap.coefficient(product);
            let mut first = Vec::new();
            for product in 0..self.dataset.products.len() {
                first.extend(self.production_terms(0, 0, product, weight)?);
            }
            let name = format!("usage cap {} on {}", cap.name, self.period_name(0));
            self.add(name, ConstraintType::LessThanOrEqual, first, cap.limit)?;
            rows += 1;

            if !self.dataset.is_two_stage() {
                continue;
            }
            for scenario in 0..self.dataset.scenarios.len() {
                let mut terms = Vec::new();
                for product in 0..self.dataset.products.len() {
                    terms.extend(self.production_terms(1, scenario, product, weight)?);
                }
                let name = format!(
                    "usage cap {} on {} if {}",
                    cap.name,
                    self.period_name(1),
                    self.scenario_name(scenario)
                );
                self.add(name, ConstraintType::LessThanOrEqual, terms, cap.limit)?;
                rows += 1;
            }
        }
        Ok(rows)
    }

    /// recourse assignment ≤ prerequisite period-1 assignment.
    fn stage_linking(&mut self) -> Result<usize> {
        let mut rows = 0;
        let links: Vec<_> = self
            .vars
            .recourse
            .iter()
            .filter_map(|(k, &id)| k.prerequisite().map(|pre| (*k, id, pre)))
            .collect();
        for (key, id, pre) in links {
            let required = *self.vars.first_stage.get(&pre).ok_or_else(|| {
                SolverError::InvalidProblem(format!(
                    "missing period-1 prerequisite for {} at {}",
                    self.dataset.products[key.product].name,
                    self.dataset.resources[key.resource].name
                ))
            })?;
            let name = format!(
                "{} prerequisite for {} at {} if {}",
                key.process,
                self.dataset.products[key.product].name,
                self.dataset.resources[key.resource].name,
                self.scenario_name(key.scenario)
            );
            self.add(
                name,
                ConstraintType::LessThanOrEqual,
                vec![(id, 1.0), (required, -1.0)],
                0.0,
            )?;
            rows += 1;
        }
        Ok(rows)
    }

    /// end inventory ≥ target x indicator. Only pushes the indicator to 0
    /// on a miss; nothing pushes it to 1 on a hit.
    fn service_linkage(&mut self) -> Result<usize> {
        let mut rows = 0;
        let dataset = self.dataset;
        let last = dataset.last_period();
        let indicators: Vec<(usize, VarId)> =
            self.vars.service.iter().map(|(&s, &id)| (s, id)).collect();
        for (scenario, indicator) in indicators {
            for (product, item) in dataset.products.iter().enumerate() {
                let Some(target) = item.end_inventory_target else {
                    continue;
                };
                let key = BalanceKey {
                    period: last,
                    scenario,
                    product,
                };
                let name = format!(
                    "end inventory of {} if {}",
                    item.name,
                    self.scenario_name(scenario)
                );
                self.add(
                    name,
                    ConstraintType::GreaterThanOrEqual,
                    vec![(self.vars.inventory[&key], 1.0), (indicator, -target)],
                    0.0,
                )?;
                rows += 1;
            }
        }
        Ok(rows)
    }

    /// Σ probability x indicator ≥ threshold.
    fn service_threshold(&mut self) -> Result<usize> {
        let Some(level) = self.dataset.service_level else {
            return Ok(0);
        };
        let terms: Vec<(VarId, f64)> = self
            .vars
            .service
            .iter()
            .map(|(&s, &id)| (id, self.dataset.scenarios[s].probability))
            .collect();
        self.add(
            "end inventory service level".to_string(),
            ConstraintType::GreaterThanOrEqual,
            terms,
            level.probability_threshold,
        )?;
        Ok(1)
    }
}
