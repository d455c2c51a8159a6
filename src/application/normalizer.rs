// Input normalizer: raw plan request -> validated planning problem

use std::collections::HashSet;

use tracing::warn;

use crate::domain::{
    CostCoefficients, CostKind, PeriodRecord, PlanningProblem, RawPlanRequest,
};

/// Reasons a plan request is rejected before any model is built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("period sequence is empty")]
    EmptyPeriods,

    #[error("duplicate periods: {}", .0.join(", "))]
    DuplicatePeriods(Vec<String>),

    #[error("demand missing for periods: {}", .0.join(", "))]
    MissingDemand(Vec<String>),

    #[error("demand given for undeclared periods: {}", .0.join(", "))]
    UnknownDemandPeriods(Vec<String>),

    #[error("missing cost keys: {}", .0.join(", "))]
    MissingCosts(Vec<String>),

    #[error("{field} must be a non-negative number, got {value}")]
    InvalidValue { field: String, value: f64 },
}

pub type Result<T> = std::result::Result<T, ValidationError>;

fn check_value(field: impl Into<String>, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::InvalidValue {
            field: field.into(),
            value,
        })
    }
}

/// Validate a raw request into a planning problem
pub fn normalize(request: &RawPlanRequest) -> Result<PlanningProblem> {
    if request.periods.is_empty() {
        return Err(ValidationError::EmptyPeriods);
    }

    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for period in &request.periods {
        let key = period.key();
        if !seen.insert(key.clone()) && !duplicates.contains(&key) {
            duplicates.push(key);
        }
    }
    if !duplicates.is_empty() {
        return Err(ValidationError::DuplicatePeriods(duplicates));
    }

    let missing: Vec<String> = request
        .periods
        .iter()
        .map(|p| p.key())
        .filter(|key| !request.demand.contains_key(key))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingDemand(missing));
    }

    let unknown: Vec<String> = request
        .demand
        .keys()
        .filter(|key| !seen.contains(*key))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(ValidationError::UnknownDemandPeriods(unknown));
    }

    let missing_costs: Vec<String> = CostKind::ALL
        .iter()
        .filter(|kind| !request.costs.contains_key(kind.key()))
        .map(|kind| kind.key().to_string())
        .collect();
    if !missing_costs.is_empty() {
        return Err(ValidationError::MissingCosts(missing_costs));
    }

    let mut costs = CostCoefficients::default();
    for (key, &value) in &request.costs {
        match CostKind::from_key(key) {
            Some(kind) => costs.set(kind, check_value(format!("costos.{key}"), value)?),
            None => warn!(cost = %key, "ignoring unknown cost key"),
        }
    }

    let periods = request
        .periods
        .iter()
        .map(|id| {
            let key = id.key();
            let demand = request.demand.get(&key).copied().unwrap_or_default();
            Ok(PeriodRecord {
                demand: check_value(format!("demanda.{key}"), demand)?,
                id: id.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PlanningProblem {
        periods,
        initial_workforce: check_value("W0", request.initial_workforce)?,
        initial_inventory: check_value("I0", request.initial_inventory)?,
        initial_backlog: check_value("S0", request.initial_backlog)?,
        regular_rate: check_value("prod_normal", request.regular_rate)?,
        overtime_rate: check_value("prod_extra", request.overtime_rate)?,
        overtime_capacity_ratio: check_value("max_extra", request.overtime_capacity_ratio)?,
        costs,
        min_final_inventory: check_value(
            "inventario_final_min",
            request.min_final_inventory,
        )?,
    })
}
