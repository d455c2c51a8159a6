use aggplan::infrastructure::logging;
use aggplan::{start_server, AppConfig, ServerConfig, SolverFactory};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    // Config path: first argument, then AGGPLAN_CONFIG, else built-in defaults
    let path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("AGGPLAN_CONFIG"))
        .map(PathBuf::from);
    let config = AppConfig::load_or_default(path.as_deref())?;

    let solver = SolverFactory::create_from_backend(config.solver.backend);

    let server = ServerConfig::new(config.server.address, solver)
        .with_options(config.planner_options());
    start_server(server).await?;

    Ok(())
}
