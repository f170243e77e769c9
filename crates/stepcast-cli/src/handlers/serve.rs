//! `serve` command: run the HTTP server until interrupted.

use stepcast_axum::{ServerConfig, start_server};
use tracing::info;

pub async fn execute(config: ServerConfig) -> anyhow::Result<()> {
    info!(
        addr = %config.bind_addr(),
        delay_scale = config.task.delay_scale,
        "Starting stepcast server"
    );

    tokio::select! {
        result = start_server(config) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested");
            Ok(())
        }
    }
}
