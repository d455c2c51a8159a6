// Domain service interface for solving optimization problems
// Any solver backend plugs in behind this trait; the planner never names a concrete one

use super::models::{OptimizationProblem, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Solver ran out of resources: {0}")]
    ResourceExhausted(String),
}

impl SolverError {
    /// Transient failures may succeed when retried; everything else is deterministic
    pub fn is_transient(&self) -> bool {
        matches!(self, SolverError::ResourceExhausted(_))
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization solvers
///
/// Implementations return a `Solution` for every planning outcome (optimal,
/// infeasible, unbounded, undefined) and an `Err` only when the backend itself
/// failed. Variable values are positional: index `i` of
/// `Solution::variable_values` is column `i` of the submitted problem.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();

        if problem.objective.coefficients.is_empty() {
            errors.push("Objective must have at least one coefficient".to_string());
        }

        let num_vars = problem.num_variables();

        if problem.variables.len() != num_vars {
            errors.push(format!(
                "Number of variables ({}) doesn't match objective coefficients ({})",
                problem.variables.len(),
                num_vars
            ));
        }

        for (i, constraint) in problem.constraints.iter().enumerate() {
            match constraint.max_column() {
                Some(column) if column >= num_vars => errors.push(format!(
                    "Constraint {} '{}' references column {} but problem has {} variables",
                    i, constraint.name, column, num_vars
                )),
                None => errors.push(format!("Constraint {} '{}' has no terms", i, constraint.name)),
                _ => {}
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}
