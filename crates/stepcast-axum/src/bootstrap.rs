//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where the HTTP adapter is wired together.
//! All concrete implementations are instantiated here.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use stepcast_core::ports::StepExecutor;
use stepcast_core::{TaskConfig, arithmetic_task};

use crate::sse::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_KEEP_ALIVE};

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Interval between heartbeat comments on idle streams.
    pub keep_alive: Duration,
    /// Events buffered between a run and its connection.
    pub channel_capacity: usize,
    /// How each per-request task is built and executed.
    pub task: TaskConfig,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Create config with default settings.
    pub fn with_defaults() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            keep_alive: DEFAULT_KEEP_ALIVE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            task: TaskConfig::with_defaults(),
            cors: CorsConfig::default(),
        }
    }

    /// Set the task configuration.
    #[must_use]
    pub fn with_task(mut self, task: TaskConfig) -> Self {
        self.task = task;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    /// Address to bind, as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Application context for the Axum adapter.
///
/// Holds only immutable, shareable pieces. Everything mutable about a run
/// is created per request.
pub struct AxumContext {
    /// Recipe for the task started by each stream request.
    pub task: TaskConfig,
    /// Executor shared by all runs; stateless.
    pub executor: Arc<dyn StepExecutor>,
    /// Heartbeat interval.
    pub keep_alive: Duration,
    /// Per-stream channel capacity.
    pub channel_capacity: usize,
}

/// Bootstrap the Axum adapter.
///
/// Builds the task once up front so a bad configuration fails at startup
/// rather than on the first request.
pub fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let task = arithmetic_task(&config.task)?;
    let executor = config.task.executor();

    tracing::info!(
        target: "stepcast.bootstrap",
        steps = task.len(),
        delay_scale = executor.delay_scale(),
        fail_step = ?config.task.fail_step,
        keep_alive_secs = config.keep_alive.as_secs(),
        channel_capacity = config.channel_capacity,
        "Axum bootstrap resolved task"
    );

    Ok(AxumContext {
        task: config.task.clone(),
        executor: Arc::new(executor),
        keep_alive: config.keep_alive,
        channel_capacity: config.channel_capacity,
    })
}

/// Start the web server and serve until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;
    use tracing::info;

    let ctx = bootstrap(&config)?;
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("stepcast server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
