// COIN-OR CBC adapter through good_lp

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, SolutionStatus as DomainSolutionStatus, VariableType},
};
use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolutionStatus as GoodLpStatus, SolverModel,
    Variable as GoodLpVariable,
};
use std::time::Instant;
use tracing::debug;

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        let start_time = Instant::now();

        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(problem.variables.len());

        for var_def in &problem.variables {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let var = match var_def.variable_type {
                VariableType::Integer => vars.add(
                    variable()
                        .integer()
                        .min(lower)
                        .max(upper)
                        .name(var_def.name.clone()),
                ),
                VariableType::Continuous => {
                    vars.add(variable().min(lower).max(upper).name(var_def.name.clone()))
                }
            };
            lp_variables.push(var);
        }

        let mut obj_expr: Expression = 0.into();
        for (i, &coeff) in problem.objective.coefficients.iter().enumerate() {
            if coeff != 0.0 {
                obj_expr += coeff * lp_variables[i];
            }
        }

        let mut lp_model = vars.minimise(obj_expr).using(coin_cbc::coin_cbc);

        let config = &problem.solver_config;
        if !config.verbose {
            lp_model.set_parameter("logLevel", "0");
        }
        if let Some(seconds) = config.time_limit {
            lp_model.set_parameter("seconds", &seconds.to_string());
        }
        if let Some(gap) = config.gap_tolerance {
            lp_model.set_parameter("ratioGap", &gap.to_string());
        }

        for constraint in &problem.constraints {
            let mut lhs: Expression = 0.into();
            for &(column, coeff) in &constraint.terms {
                lhs += coeff * lp_variables[column];
            }

            lp_model = match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => lp_model.with(lhs.leq(constraint.bound)),
                ConstraintType::Equal => lp_model.with(lhs.eq(constraint.bound)),
                ConstraintType::GreaterThanOrEqual => lp_model.with(lhs.geq(constraint.bound)),
            };
        }

        let solution_result = lp_model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        let statistics = SolverStatistics::for_problem(problem, solve_time);
        debug!(solve_time_ms = solve_time, "CBC finished");

        match solution_result {
            Ok(sol) => match outcome(sol.status()) {
                DomainSolutionStatus::Optimal => {
                    let variable_values: Vec<f64> =
                        lp_variables.iter().map(|&var| sol.value(var)).collect();
                    let actual_obj = problem.objective.evaluate(&variable_values);

                    let mut solution = DomainSolution::optimal(actual_obj, variable_values);
                    solution.message = format!("Optimal solution found for '{}'", problem.name);
                    Ok(solution.with_statistics(statistics))
                }
                // the incumbent is not proven optimal and may not even be integral
                status => Ok(DomainSolution::new(
                    status,
                    "CBC reached its time limit before proving optimality",
                )
                .with_statistics(statistics)),
            },
            Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
                DomainSolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_statistics(statistics)),
            // early stops good_lp cannot classify
            Err(ResolutionError::Other(reason)) if reason == "Stopped" => Ok(DomainSolution::new(
                DomainSolutionStatus::Undefined,
                "CBC stopped before proving optimality",
            )
            .with_statistics(statistics)),
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

/// Planning outcome of a CBC run that returned a column vector
///
/// Stopping inside the configured gap tolerance counts as optimal.
fn outcome(status: GoodLpStatus) -> DomainSolutionStatus {
    match status {
        GoodLpStatus::Optimal | GoodLpStatus::GapLimit => DomainSolutionStatus::Optimal,
        GoodLpStatus::TimeLimit => DomainSolutionStatus::Undefined,
    }
}
