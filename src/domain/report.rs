// Plan report: the externally visible outcome of a planning request

use indexmap::IndexMap;
use serde::Serialize;

use super::models::{SolutionQuality, SolverStatistics};
use super::value_objects::{PlanVariable, SolutionStatus};

/// Resolved decision values of one period; `None` when no solution exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodDetail {
    #[serde(rename = "W")]
    pub workforce: Option<f64>,
    #[serde(rename = "H")]
    pub hires: Option<f64>,
    #[serde(rename = "L")]
    pub layoffs: Option<f64>,
    #[serde(rename = "P")]
    pub regular_production: Option<f64>,
    #[serde(rename = "OT")]
    pub overtime_production: Option<f64>,
    #[serde(rename = "I")]
    pub inventory: Option<f64>,
    #[serde(rename = "S")]
    pub shortage: Option<f64>,
    #[serde(rename = "SUB")]
    pub subcontracted: Option<f64>,
}

impl PeriodDetail {
    pub fn set(&mut self, variable: PlanVariable, value: f64) {
        *self.slot_mut(variable) = Some(value);
    }

    fn slot_mut(&mut self, variable: PlanVariable) -> &mut Option<f64> {
        match variable {
            PlanVariable::Workforce => &mut self.workforce,
            PlanVariable::Hires => &mut self.hires,
            PlanVariable::Layoffs => &mut self.layoffs,
            PlanVariable::RegularProduction => &mut self.regular_production,
            PlanVariable::OvertimeProduction => &mut self.overtime_production,
            PlanVariable::Subcontracted => &mut self.subcontracted,
            PlanVariable::Inventory => &mut self.inventory,
            PlanVariable::Shortage => &mut self.shortage,
        }
    }
}

/// Solver-side facts about how a report was produced
///
/// Kept out of the wire format; surfaced through logs and the gRPC response.
#[derive(Debug, Clone, Default)]
pub struct SolveDiagnostics {
    pub solver: String,
    pub message: String,
    pub statistics: SolverStatistics,
    pub quality: Option<SolutionQuality>,
}

/// Per-period aggregate plan
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    #[serde(rename = "estado")]
    pub status: SolutionStatus,
    #[serde(rename = "costo_total")]
    pub total_cost: Option<f64>,
    /// Keyed by period, in input order
    #[serde(rename = "detalle_por_periodo")]
    pub periods: IndexMap<String, PeriodDetail>,
    #[serde(skip)]
    pub diagnostics: SolveDiagnostics,
}

impl PlanReport {
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    pub fn period(&self, key: &str) -> Option<&PeriodDetail> {
        self.periods.get(key)
    }
}
