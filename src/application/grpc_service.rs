use tonic::{Request, Response, Status};
use tracing::{info, warn};

use super::error::PlanError;
use super::mappers::{self, aggplan};
use super::planner::Planner;

/// gRPC service implementation
pub struct GrpcPlanningService {
    planner: Planner,
}

impl GrpcPlanningService {
    pub fn new(planner: Planner) -> Self {
        Self { planner }
    }

    /// Run blocking model work off the async runtime
    async fn run<T, F>(&self, job: F) -> Result<T, Status>
    where
        T: Send + 'static,
        F: FnOnce(Planner) -> Result<T, PlanError> + Send + 'static,
    {
        let planner = self.planner.clone();
        tokio::task::spawn_blocking(move || job(planner))
            .await
            .map_err(|e| Status::internal(format!("planning task failed: {e}")))?
            .map_err(|e| {
                warn!(error = %e, "plan request failed");
                mappers::plan_error_to_status(e)
            })
    }
}

#[tonic::async_trait]
impl aggplan::aggregate_planning_server::AggregatePlanning for GrpcPlanningService {
    async fn solve_plan(
        &self,
        request: Request<aggplan::PlanRequest>,
    ) -> Result<Response<aggplan::PlanResponse>, Status> {
        let raw = mappers::proto_to_domain_request(request.into_inner());
        info!(
            periods = raw.periods.len(),
            solver = self.planner.solver_name(),
            "received plan request"
        );

        let report = self.run(move |planner| planner.plan(&raw)).await?;

        Ok(Response::new(mappers::domain_to_proto_response(report)))
    }

    async fn validate_plan(
        &self,
        request: Request<aggplan::PlanRequest>,
    ) -> Result<Response<aggplan::ValidationResult>, Status> {
        let raw = mappers::proto_to_domain_request(request.into_inner());

        let result = self
            .run(move |planner| match planner.inspect(&raw) {
                Ok(summary) => Ok(mappers::summary_to_proto_validation(summary)),
                Err(PlanError::Validation(e)) => Ok(aggplan::ValidationResult {
                    is_valid: false,
                    errors: vec![e.to_string()],
                    ..Default::default()
                }),
                Err(e) => Err(e),
            })
            .await?;

        Ok(Response::new(result))
    }
}
