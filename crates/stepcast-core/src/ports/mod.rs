//! Port definitions (trait abstractions) for the core domain.
//!
//! Adapters (HTTP, CLI) implement these traits; the orchestration only
//! depends on the abstractions.

mod executor;
mod monitor;

use thiserror::Error;

use crate::domain::TaskError;

pub use executor::{StepExecutor, StepFailure};
pub use monitor::{AlwaysConnected, DisconnectionMonitor, TokenMonitor};

#[cfg(test)]
pub use monitor::MockDisconnectionMonitor;

/// Core domain error type.
///
/// Adapters should map this to their own error types (HTTP status codes,
/// CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// The task could not be assembled.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}
