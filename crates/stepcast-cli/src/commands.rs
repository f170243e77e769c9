//! Subcommands and their arguments.

use std::time::Duration;

use clap::{Args, Subcommand};
use stepcast_axum::ServerConfig;
use stepcast_core::TaskConfig;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server exposing `/stream-progress`
    Serve {
        /// Interface to bind
        #[arg(long, env = "STEPCAST_HOST", default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(short, long, env = "STEPCAST_PORT", default_value_t = 8000)]
        port: u16,
        /// Seconds between heartbeat comments on idle streams
        #[arg(long, env = "STEPCAST_KEEP_ALIVE_SECS", default_value_t = 15)]
        keep_alive_secs: u64,
        /// Events buffered per stream before the run waits for the client
        #[arg(long, env = "STEPCAST_CHANNEL_CAPACITY", default_value_t = 16)]
        channel_capacity: usize,
        /// Allowed CORS origins (comma separated); all origins when empty
        #[arg(long, env = "STEPCAST_ALLOWED_ORIGINS", value_delimiter = ',')]
        allowed_origins: Vec<String>,
        #[command(flatten)]
        task: TaskArgs,
    },

    /// Run the task once locally and print its event stream to stdout
    Run {
        #[command(flatten)]
        task: TaskArgs,
    },
}

/// Options shaping the task each run executes.
#[derive(Args, Debug, Clone)]
pub struct TaskArgs {
    /// Multiplier for each step's simulated duration (0 runs instantly)
    #[arg(long, env = "STEPCAST_DELAY_SCALE", default_value_t = 1.0)]
    pub delay_scale: f64,
    /// Make the named step fail (sum, multiply or divide)
    #[arg(long, env = "STEPCAST_FAIL_STEP")]
    pub fail_step: Option<String>,
}

impl TaskArgs {
    pub fn into_config(self) -> TaskConfig {
        let config = TaskConfig::with_defaults().with_delay_scale(self.delay_scale);
        match self.fail_step {
            Some(step) => config.with_fail_step(step),
            None => config,
        }
    }
}

/// Assemble the server configuration from `serve` arguments.
pub fn server_config(
    host: String,
    port: u16,
    keep_alive_secs: u64,
    channel_capacity: usize,
    allowed_origins: Vec<String>,
    task: TaskArgs,
) -> ServerConfig {
    let mut config = ServerConfig::with_defaults().with_task(task.into_config());
    config.host = host;
    config.port = port;
    config.keep_alive = Duration::from_secs(keep_alive_secs.max(1));
    config.channel_capacity = channel_capacity;

    let origins: Vec<String> = allowed_origins
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if origins.is_empty() {
        config
    } else {
        config.with_allowed_origins(origins)
    }
}
