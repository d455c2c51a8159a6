// Infrastructure: Server setup and lifecycle

use std::net::SocketAddr;
use std::sync::Arc;
use tonic::transport::Server;
use tracing::info;

use crate::application::mappers::aggplan::aggregate_planning_server::AggregatePlanningServer;
use crate::application::{GrpcPlanningService, Planner, PlannerOptions};
use crate::domain::solver_service::SolverService;

pub struct ServerConfig {
    pub address: SocketAddr,
    pub solver: Arc<dyn SolverService>,
    pub options: PlannerOptions,
}

impl ServerConfig {
    pub fn new(address: SocketAddr, solver: Arc<dyn SolverService>) -> Self {
        Self {
            address,
            solver,
            options: PlannerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PlannerOptions) -> Self {
        self.options = options;
        self
    }
}

pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let planner = Planner::new(config.solver).with_options(config.options);

    info!(
        address = %config.address,
        solver = planner.solver_name(),
        capacity_rule = ?planner.options().capacity_rule,
        time_limit = ?planner.options().time_limit,
        "aggregate planning server listening"
    );

    Server::builder()
        .add_service(AggregatePlanningServer::new(GrpcPlanningService::new(planner)))
        .serve_with_shutdown(config.address, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
