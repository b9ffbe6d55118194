use anyhow::Result;
use lanwatch::{config::ServerConfig, device_repo::DeviceRepo, logging, routes};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = ServerConfig::load()?;

    let repo = Arc::new(DeviceRepo::connect(&config.database.path).await?);
    repo.init().await?;

    let app = routes::app(repo, &config.auth.token);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
        }
    }

    Ok(())
}
