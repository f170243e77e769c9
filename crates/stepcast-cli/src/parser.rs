//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the stepcast progress streamer.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "stepcast")]
#[command(about = "Stream multi-step task progress as Server-Sent Events")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is not set.
    pub const fn default_log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        // Verify the CLI parser can be constructed
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["stepcast", "--verbose", "run"]);
        assert!(cli.verbose);
        assert_eq!(cli.default_log_filter(), "debug");
        assert!(matches!(cli.command, Some(Commands::Run { .. })));
    }

    #[test]
    fn test_no_command() {
        let cli = Cli::parse_from(["stepcast"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.default_log_filter(), "info");
    }
}
