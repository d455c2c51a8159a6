// Application layer: the planning pipeline and its gRPC front

pub mod error;
pub mod model_builder;
pub mod normalizer;
pub mod planner;
pub mod result_decoder;

#[cfg(feature = "server")]
pub mod grpc_service;
#[cfg(feature = "server")]
pub mod mappers;

pub use error::PlanError;
pub use model_builder::{ModelBuilder, PlanModel, VariableMap};
pub use normalizer::{normalize, ValidationError};
pub use planner::{ModelSummary, Planner, PlannerOptions};
pub use result_decoder::decode;

#[cfg(feature = "server")]
pub use grpc_service::GrpcPlanningService;
