use std::net::SocketAddr;

use anyhow::Context;
use project_planner::{TaskRepository, config, http_api, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let planner_config = config::load()?;
    logging::init_logging(None, planner_config.log_level.as_deref())?;

    let addr: SocketAddr = planner_config
        .http
        .addr
        .parse()
        .with_context(|| format!("invalid http address {:?}", planner_config.http.addr))?;

    println!("project-planner HTTP API listening on http://{addr}");
    let state = http_api::AppState::new(TaskRepository::new(), planner_config.chart);
    http_api::serve(addr, state).await?;
    Ok(())
}
