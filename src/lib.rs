// Domain layer: LP description, planning records, solver contract
pub mod domain;

// Application layer: normalize -> build -> solve -> decode
pub mod application;

// Infrastructure layer: configuration, logging, gRPC server
pub mod infrastructure;

// Solver adapters: Concrete implementations of SolverService
#[cfg(feature = "solvers")]
pub mod solver;

// Re-export commonly used types
pub use domain::{
    CapacityRule, PeriodDetail, PeriodId, PlanReport, PlanVariable, PlanningProblem,
    RawPlanRequest, Solution, SolutionStatus, SolverBackend, SolverError, SolverService,
};

pub use application::{
    normalize, ModelBuilder, ModelSummary, PlanError, Planner, PlannerOptions, ValidationError,
};

pub use infrastructure::{AppConfig, ConfigError};

#[cfg(feature = "server")]
pub use infrastructure::{start_server, ServerConfig};

#[cfg(feature = "solvers")]
pub use solver::{CoinCbcSolver, HighsSolver, SolverFactory};
