// Domain module: LP description, planning records and the solver contract

pub mod models;
pub mod planning;
pub mod report;
pub mod solver_service;
pub mod value_objects;

pub use models::*;
pub use planning::*;
pub use report::*;
pub use solver_service::*;
pub use value_objects::*;
