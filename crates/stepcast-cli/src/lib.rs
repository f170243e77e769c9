//! CLI interface for stepcast.
//!
//! Parses arguments into server and task configuration and dispatches to
//! the command handlers. `main.rs` is the composition root.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs binary
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use commands::{Commands, TaskArgs, server_config};
pub use parser::Cli;
