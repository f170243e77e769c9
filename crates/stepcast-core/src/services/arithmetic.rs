//! The built-in arithmetic task: sum, multiply, divide.
//!
//! Each operation simulates work with a fixed nominal duration. A single
//! step can be configured to fail, which exercises the error path end to
//! end without touching the orchestration.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{Step, StepError, StepResult, StepWork, Task};
use crate::ports::CoreError;

use super::executor::SimulatedExecutor;

/// Operations making up the arithmetic task, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Sum,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    pub const ALL: [Self; 3] = [Self::Sum, Self::Multiply, Self::Divide];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }

    pub const fn nominal_duration(self) -> Duration {
        match self {
            Self::Sum => Duration::from_secs(2),
            Self::Multiply => Duration::from_secs(3),
            Self::Divide => Duration::from_millis(1500),
        }
    }

    fn status_message(self) -> &'static str {
        match self {
            Self::Sum => "Sum operation successful",
            Self::Multiply => "Multiply operation successful",
            Self::Divide => "Divide operation successful",
        }
    }
}

struct Operation {
    op: ArithmeticOp,
    fail: bool,
}

#[async_trait]
impl StepWork for Operation {
    async fn run(&self) -> Result<StepResult, StepError> {
        if self.fail {
            return Err(StepError::Failed(format!(
                "injected failure in {} operation",
                self.op.name()
            )));
        }
        Ok(StepResult::new(self.op.status_message()))
    }
}

/// Largest accepted `delay_scale`.
pub const MAX_DELAY_SCALE: f64 = 1000.0;

/// Settings for building a task and its executor.
#[derive(Debug, Clone)]
pub struct TaskConfig {
    /// Multiplier applied to each step's nominal duration.
    pub delay_scale: f64,
    /// Name of a step that should fail when run.
    pub fail_step: Option<String>,
}

impl TaskConfig {
    pub const fn with_defaults() -> Self {
        Self {
            delay_scale: 1.0,
            fail_step: None,
        }
    }

    #[must_use]
    pub const fn with_delay_scale(mut self, delay_scale: f64) -> Self {
        self.delay_scale = delay_scale;
        self
    }

    #[must_use]
    pub fn with_fail_step(mut self, step: impl Into<String>) -> Self {
        self.fail_step = Some(step.into());
        self
    }

    /// Executor honouring `delay_scale`.
    pub fn executor(&self) -> SimulatedExecutor {
        SimulatedExecutor::new(self.delay_scale)
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Build a fresh arithmetic task.
///
/// Fails if `fail_step` names a step that does not exist or `delay_scale`
/// exceeds [`MAX_DELAY_SCALE`].
pub fn arithmetic_task(config: &TaskConfig) -> Result<Task, CoreError> {
    if config.delay_scale > MAX_DELAY_SCALE {
        return Err(CoreError::Configuration(format!(
            "delay scale {} exceeds maximum of {MAX_DELAY_SCALE}",
            config.delay_scale
        )));
    }

    if let Some(name) = &config.fail_step {
        if !ArithmeticOp::ALL.iter().any(|op| op.name() == name) {
            return Err(CoreError::Configuration(format!(
                "unknown step '{name}' for failure injection"
            )));
        }
    }

    let steps = ArithmeticOp::ALL
        .into_iter()
        .map(|op| {
            let fail = config.fail_step.as_deref() == Some(op.name());
            Step::new(op.name(), op.nominal_duration(), Arc::new(Operation { op, fail }))
        })
        .collect();

    Ok(Task::new(steps)?)
}
