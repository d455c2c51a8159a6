// Planning problem: the validated input of the aggregate planning model

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Period identifier as supplied by the caller
///
/// JSON requests may name periods with integers or strings. Demand maps are
/// always keyed by the string form, so identity is decided by [`PeriodId::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeriodId {
    Number(i64),
    Text(String),
}

impl PeriodId {
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodId::Number(n) => write!(f, "{n}"),
            PeriodId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PeriodId {
    fn from(value: &str) -> Self {
        PeriodId::Text(value.to_string())
    }
}

impl From<i64> for PeriodId {
    fn from(value: i64) -> Self {
        PeriodId::Number(value)
    }
}

/// Named unit costs of the objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostKind {
    RegularLabor,
    OvertimeLabor,
    Hiring,
    Layoff,
    Holding,
    Shortage,
    Materials,
    Subcontracting,
}

impl CostKind {
    pub const ALL: [CostKind; 8] = [
        CostKind::RegularLabor,
        CostKind::OvertimeLabor,
        CostKind::Hiring,
        CostKind::Layoff,
        CostKind::Holding,
        CostKind::Shortage,
        CostKind::Materials,
        CostKind::Subcontracting,
    ];

    /// Key of this cost in the `costos` request map
    pub fn key(self) -> &'static str {
        match self {
            CostKind::RegularLabor => "tiempo_regular",
            CostKind::OvertimeLabor => "tiempo_extra",
            CostKind::Hiring => "contratacion",
            CostKind::Layoff => "despido",
            CostKind::Holding => "inventario",
            CostKind::Shortage => "faltante",
            CostKind::Materials => "materiales",
            CostKind::Subcontracting => "subcontratacion",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// Unit cost coefficients, one per [`CostKind`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostCoefficients {
    pub regular_labor: f64,
    pub overtime_labor: f64,
    pub hiring: f64,
    pub layoff: f64,
    pub holding: f64,
    pub shortage: f64,
    pub materials: f64,
    pub subcontracting: f64,
}

impl CostCoefficients {
    pub fn get(&self, kind: CostKind) -> f64 {
        match kind {
            CostKind::RegularLabor => self.regular_labor,
            CostKind::OvertimeLabor => self.overtime_labor,
            CostKind::Hiring => self.hiring,
            CostKind::Layoff => self.layoff,
            CostKind::Holding => self.holding,
            CostKind::Shortage => self.shortage,
            CostKind::Materials => self.materials,
            CostKind::Subcontracting => self.subcontracting,
        }
    }

    pub fn set(&mut self, kind: CostKind, value: f64) {
        let slot = match kind {
            CostKind::RegularLabor => &mut self.regular_labor,
            CostKind::OvertimeLabor => &mut self.overtime_labor,
            CostKind::Hiring => &mut self.hiring,
            CostKind::Layoff => &mut self.layoff,
            CostKind::Holding => &mut self.holding,
            CostKind::Shortage => &mut self.shortage,
            CostKind::Materials => &mut self.materials,
            CostKind::Subcontracting => &mut self.subcontracting,
        };
        *slot = value;
    }
}

/// Raw plan request, exactly as it arrives over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlanRequest {
    #[serde(rename = "periodo")]
    pub periods: Vec<PeriodId>,
    #[serde(rename = "W0")]
    pub initial_workforce: f64,
    #[serde(rename = "I0")]
    pub initial_inventory: f64,
    #[serde(rename = "S0", default)]
    pub initial_backlog: f64,
    #[serde(rename = "prod_normal")]
    pub regular_rate: f64,
    #[serde(rename = "prod_extra")]
    pub overtime_rate: f64,
    #[serde(rename = "max_extra")]
    pub overtime_capacity_ratio: f64,
    #[serde(rename = "demanda")]
    pub demand: IndexMap<String, f64>,
    #[serde(rename = "costos")]
    pub costs: IndexMap<String, f64>,
    #[serde(rename = "inventario_final_min")]
    pub min_final_inventory: f64,
}

/// Per-period input data, addressed by period index
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodRecord {
    pub id: PeriodId,
    pub demand: f64,
}

/// Validated, immutable planning problem
///
/// Only the normalizer constructs one, so every instance has a non-empty
/// horizon with unique periods, a demand entry per period and non-negative
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningProblem {
    pub(crate) periods: Vec<PeriodRecord>,
    pub(crate) initial_workforce: f64,
    pub(crate) initial_inventory: f64,
    pub(crate) initial_backlog: f64,
    pub(crate) regular_rate: f64,
    pub(crate) overtime_rate: f64,
    pub(crate) overtime_capacity_ratio: f64,
    pub(crate) costs: CostCoefficients,
    pub(crate) min_final_inventory: f64,
}

impl PlanningProblem {
    pub fn periods(&self) -> &[PeriodRecord] {
        &self.periods
    }

    pub fn num_periods(&self) -> usize {
        self.periods.len()
    }

    pub fn initial_workforce(&self) -> f64 {
        self.initial_workforce
    }

    pub fn initial_inventory(&self) -> f64 {
        self.initial_inventory
    }

    pub fn initial_backlog(&self) -> f64 {
        self.initial_backlog
    }

    pub fn regular_rate(&self) -> f64 {
        self.regular_rate
    }

    pub fn overtime_rate(&self) -> f64 {
        self.overtime_rate
    }

    pub fn overtime_capacity_ratio(&self) -> f64 {
        self.overtime_capacity_ratio
    }

    pub fn costs(&self) -> &CostCoefficients {
        &self.costs
    }

    pub fn min_final_inventory(&self) -> f64 {
        self.min_final_inventory
    }

    pub fn total_demand(&self) -> f64 {
        self.periods.iter().map(|p| p.demand).sum()
    }
}
