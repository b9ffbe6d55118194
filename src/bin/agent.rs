use anyhow::Result;
use lanwatch::{agent, config::AgentConfig, logging};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = AgentConfig::load()?;
    tracing::info!(
        cidr = %config.network.cidr,
        collector = format!("{}:{}", config.collector.host, config.collector.port),
        debug = config.agent.debug,
        "agent starting"
    );

    agent::run(config).await?;
    Ok(())
}
