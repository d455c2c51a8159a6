// Mappers: Convert between gRPC protobuf types and domain records
// Keeps prost types out of the planning core

use indexmap::IndexMap;
use tonic::Status;

use crate::domain::{PeriodId, PlanReport, RawPlanRequest};

use super::error::PlanError;
use super::planner::ModelSummary;

pub mod aggplan {
    tonic::include_proto!("aggplan");
}

use aggplan as proto;

/// proto maps are unordered; sort so error messages are stable
fn sorted(map: std::collections::HashMap<String, f64>) -> IndexMap<String, f64> {
    let mut entries: Vec<_> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.into_iter().collect()
}

/// Convert protobuf PlanRequest to the raw domain request
pub fn proto_to_domain_request(request: proto::PlanRequest) -> RawPlanRequest {
    RawPlanRequest {
        periods: request.periodo.into_iter().map(PeriodId::Text).collect(),
        initial_workforce: request.w0,
        initial_inventory: request.i0,
        initial_backlog: request.s0,
        regular_rate: request.prod_normal,
        overtime_rate: request.prod_extra,
        overtime_capacity_ratio: request.max_extra,
        demand: sorted(request.demanda),
        costs: sorted(request.costos),
        min_final_inventory: request.inventario_final_min,
    }
}

/// Convert a domain PlanReport to protobuf PlanResponse
pub fn domain_to_proto_response(report: PlanReport) -> proto::PlanResponse {
    let detalle_por_periodo = report
        .periods
        .into_iter()
        .map(|(periodo, d)| proto::PeriodDetail {
            periodo,
            w: d.workforce,
            h: d.hires,
            l: d.layoffs,
            p: d.regular_production,
            ot: d.overtime_production,
            i: d.inventory,
            s: d.shortage,
            sub: d.subcontracted,
        })
        .collect();

    let diagnostics = report.diagnostics;
    let quality = diagnostics.quality.unwrap_or_default();

    proto::PlanResponse {
        estado: report.status.to_string(),
        costo_total: report.total_cost,
        detalle_por_periodo,
        message: diagnostics.message,
        statistics: Some(proto::SolverStatistics {
            solver_backend: diagnostics.solver,
            solve_time_ms: diagnostics.statistics.solve_time_ms,
            num_variables: diagnostics.statistics.num_variables,
            num_constraints: diagnostics.statistics.num_constraints,
            num_integer_vars: diagnostics.statistics.num_integer_vars,
            max_constraint_violation: quality.max_constraint_violation,
            max_integrality_violation: quality.max_integrality_violation,
        }),
    }
}

/// Convert a model summary to protobuf ValidationResult
pub fn summary_to_proto_validation(summary: ModelSummary) -> proto::ValidationResult {
    proto::ValidationResult {
        is_valid: true,
        errors: Vec::new(),
        warnings: summary.warnings,
        num_periods: summary.num_periods as u32,
        num_variables: summary.num_variables as u32,
        num_constraints: summary.num_constraints as u32,
        num_integer_vars: summary.num_integer_variables as u32,
    }
}

/// Map planning failures onto gRPC status codes
pub fn plan_error_to_status(error: PlanError) -> Status {
    match error {
        PlanError::Validation(e) => Status::invalid_argument(e.to_string()),
        e @ (PlanError::SolverUnavailable { .. } | PlanError::SolverCrashed { .. }) => {
            Status::unavailable(e.to_string())
        }
        e @ PlanError::MalformedSolution { .. } => Status::internal(e.to_string()),
    }
}
