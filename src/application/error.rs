use crate::domain::SolverError;

use super::normalizer::ValidationError;

/// Failures of a planning request
///
/// Infeasible, unbounded and undefined plans are not errors; they come back
/// as a `PlanReport` with the matching status.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("invalid plan request: {0}")]
    Validation(#[from] ValidationError),

    #[error("solver '{solver}' unavailable: {source}")]
    SolverUnavailable {
        solver: String,
        #[source]
        source: SolverError,
    },

    #[error("solver '{solver}' crashed while solving")]
    SolverCrashed { solver: String },

    #[error("solver returned {actual} values for {expected} variables")]
    MalformedSolution { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, PlanError>;
