// Domain value objects shared by the LP description and the planning model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of decision variable in the optimization problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    Continuous,
    /// Integer number (x ∈ ℤ)
    Integer,
}

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

/// Status of the optimization solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolutionStatus {
    /// Found optimal solution
    Optimal,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// Solver stopped without a verdict (time limit, interruption)
    Undefined,
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::Undefined => write!(f, "Undefined"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// Automatically select best solver
    #[default]
    Auto,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}

/// How production capacity is coupled to the workforce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityRule {
    /// `regular_production ≤ regular_rate · workforce`
    #[default]
    RegularOnly,
    /// `regular_production ≤ regular_rate · workforce + overtime_rate · overtime_production`
    OvertimeAugmented,
}

/// The eight per-period decision variables of the aggregate plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanVariable {
    Workforce,
    Hires,
    Layoffs,
    RegularProduction,
    OvertimeProduction,
    Subcontracted,
    Inventory,
    Shortage,
}

impl PlanVariable {
    pub const ALL: [PlanVariable; 8] = [
        PlanVariable::Workforce,
        PlanVariable::Hires,
        PlanVariable::Layoffs,
        PlanVariable::RegularProduction,
        PlanVariable::OvertimeProduction,
        PlanVariable::Subcontracted,
        PlanVariable::Inventory,
        PlanVariable::Shortage,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position of this variable inside a period block
    pub fn offset(self) -> usize {
        self as usize
    }

    /// Hires and layoffs count whole workers
    pub fn variable_type(self) -> VariableType {
        match self {
            PlanVariable::Hires | PlanVariable::Layoffs => VariableType::Integer,
            _ => VariableType::Continuous,
        }
    }

    /// Short label used in reports and LP column names
    pub fn label(self) -> &'static str {
        match self {
            PlanVariable::Workforce => "W",
            PlanVariable::Hires => "H",
            PlanVariable::Layoffs => "L",
            PlanVariable::RegularProduction => "P",
            PlanVariable::OvertimeProduction => "OT",
            PlanVariable::Subcontracted => "SUB",
            PlanVariable::Inventory => "I",
            PlanVariable::Shortage => "S",
        }
    }
}

impl fmt::Display for PlanVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
