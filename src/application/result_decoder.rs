// Result decoder: solver solution -> per-period plan report

use indexmap::IndexMap;

use crate::domain::{
    PeriodDetail, PlanReport, PlanningProblem, Solution, SolveDiagnostics, VariableType,
};

use super::error::{PlanError, Result};
use super::model_builder::PlanModel;

/// Magnitudes below this are solver noise and reported as zero
pub const ZERO_TOLERANCE: f64 = 1e-9;

fn clean(value: f64, variable_type: VariableType) -> f64 {
    let value = match variable_type {
        VariableType::Integer => value.round(),
        VariableType::Continuous => value,
    };
    if value.abs() < ZERO_TOLERANCE {
        0.0
    } else {
        value
    }
}

/// Map a solution back onto the periods of `plan`
///
/// Non-optimal outcomes keep every period with empty values.
pub fn decode(
    plan: &PlanningProblem,
    model: &PlanModel,
    solution: Solution,
    solver: &str,
) -> Result<PlanReport> {
    let optimal = solution.is_optimal();
    let expected = model.variables.num_columns();

    if optimal && solution.variable_values.len() != expected {
        return Err(PlanError::MalformedSolution {
            expected,
            actual: solution.variable_values.len(),
        });
    }

    let mut details = vec![PeriodDetail::default(); plan.num_periods()];
    if optimal {
        for (column, &raw) in solution.variable_values.iter().enumerate() {
            if let Some((var, i)) = model.variables.locate(column) {
                details[i].set(var, clean(raw, var.variable_type()));
            }
        }
    }
    let periods: IndexMap<String, PeriodDetail> = plan
        .periods()
        .iter()
        .zip(details)
        .map(|(period, detail)| (period.id.key(), detail))
        .collect();

    let quality = optimal.then(|| model.problem.assess(&solution.variable_values));
    let total_cost = if optimal {
        solution
            .optimal_value
            .or_else(|| Some(model.problem.objective.evaluate(&solution.variable_values)))
    } else {
        None
    };

    Ok(PlanReport {
        status: solution.status,
        total_cost,
        periods,
        diagnostics: SolveDiagnostics {
            solver: solver.to_string(),
            message: solution.message,
            statistics: solution.statistics,
            quality,
        },
    })
}
