//! CLI entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stepcast_cli::{Cli, Commands, handlers, server_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging on stderr; stdout carries event frames for `run`
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Dispatch to appropriate handler
    let Some(command) = cli.command else {
        // No command provided - show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Serve {
            host,
            port,
            keep_alive_secs,
            channel_capacity,
            allowed_origins,
            task,
        } => {
            let config = server_config(
                host,
                port,
                keep_alive_secs,
                channel_capacity,
                allowed_origins,
                task,
            );
            handlers::serve::execute(config).await?;
        }
        Commands::Run { task } => {
            handlers::run::execute(task.into_config()).await?;
        }
    }

    Ok(())
}
