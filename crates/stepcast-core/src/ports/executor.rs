//! Unit-of-work executor port.
//!
//! Executes one step and reports its result. Implementations may be backed
//! by real computation or a simulated delay; the orchestration treats them
//! as opaque suspension points.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Step, StepError, StepResult};

/// A step could not complete. Never retried; aborts the task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("step '{step_name}' failed: {cause}")]
pub struct StepFailure {
    pub step_name: String,
    pub cause: StepError,
}

impl StepFailure {
    pub fn new(step_name: impl Into<String>, cause: StepError) -> Self {
        Self {
            step_name: step_name.into(),
            cause,
        }
    }
}

/// Trait for executing a single step.
///
/// # Implementations
///
/// - `SimulatedExecutor` - Waits out the step's nominal duration, then runs it
#[async_trait]
pub trait StepExecutor: Send + Sync {
    /// Execute `step` once.
    async fn execute(&self, step: &Step) -> Result<StepResult, StepFailure>;
}
