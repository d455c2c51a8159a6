// HiGHS Solver Adapter
// Translates the LP description onto the HiGHS row-wise API

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, SolutionStatus as DomainSolutionStatus, VariableType},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;
use tracing::debug;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        let start_time = Instant::now();

        let mut pb = RowProblem::default();
        let mut vars = Vec::with_capacity(problem.variables.len());

        for (var_def, &obj_coeff) in problem
            .variables
            .iter()
            .zip(&problem.objective.coefficients)
        {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let col = match var_def.variable_type {
                VariableType::Integer => pb.add_integer_column(obj_coeff, lower..upper),
                VariableType::Continuous => pb.add_column(obj_coeff, lower..upper),
            };
            vars.push(col);
        }

        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .terms
                .iter()
                .map(|&(column, coeff)| (vars[column], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let mut model = pb.optimise(Sense::Minimise);
        let config = &problem.solver_config;
        model.set_option("output_flag", config.verbose);
        if let Some(seconds) = config.time_limit {
            model.set_option("time_limit", seconds);
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }

        let solved = model.try_solve().map_err(|status| {
            SolverError::ExecutionFailed(format!("HiGHS refused to run: {:?}", status))
        })?;
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        let statistics = SolverStatistics::for_problem(problem, solve_time);
        debug!(solve_time_ms = solve_time, status = ?solved.status(), "HiGHS finished");

        let status = solved.status();
        match outcome(status, problem.objective_bounded_below()) {
            Some(DomainSolutionStatus::Optimal) => {
                let variable_values = solved.get_solution().columns().to_vec();
                let actual_obj = problem.objective.evaluate(&variable_values);

                let mut solution = DomainSolution::optimal(actual_obj, variable_values);
                solution.message = format!("Optimal solution found for '{}'", problem.name);
                Ok(solution.with_statistics(statistics))
            }
            Some(DomainSolutionStatus::Infeasible) => Ok(DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            Some(DomainSolutionStatus::Unbounded) => Ok(DomainSolution::new(
                DomainSolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_statistics(statistics)),
            Some(DomainSolutionStatus::Undefined) => Ok(DomainSolution::new(
                DomainSolutionStatus::Undefined,
                format!("HiGHS stopped without a proven optimum: {:?}", status),
            )
            .with_statistics(statistics)),
            None => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

/// Planning outcome of a HiGHS model status; `None` when the run itself failed
fn outcome(
    status: HighsModelStatus,
    objective_bounded_below: bool,
) -> Option<DomainSolutionStatus> {
    match status {
        HighsModelStatus::Optimal => Some(DomainSolutionStatus::Optimal),
        HighsModelStatus::Infeasible => Some(DomainSolutionStatus::Infeasible),
        // presolve can only say "one of the two"; a bounded objective rules out unboundedness
        HighsModelStatus::UnboundedOrInfeasible if objective_bounded_below => {
            Some(DomainSolutionStatus::Infeasible)
        }
        HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
            Some(DomainSolutionStatus::Unbounded)
        }
        HighsModelStatus::ReachedTimeLimit
        | HighsModelStatus::ReachedIterationLimit
        | HighsModelStatus::ObjectiveBound
        | HighsModelStatus::ObjectiveTarget
        | HighsModelStatus::Unknown => Some(DomainSolutionStatus::Undefined),
        _ => None,
    }
}
