//! Simulated step executor.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::{Step, StepResult};
use crate::ports::{StepExecutor, StepFailure};

/// Executes a step after waiting out its (scaled) nominal duration.
///
/// A scale of `1.0` waits the full nominal duration, `0.0` runs the work
/// immediately. Failures are returned as-is; there are no retries.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedExecutor {
    delay_scale: f64,
}

impl SimulatedExecutor {
    /// Negative or non-finite scales are treated as `0.0`.
    pub fn new(delay_scale: f64) -> Self {
        let delay_scale = if delay_scale.is_finite() && delay_scale > 0.0 {
            delay_scale
        } else {
            0.0
        };
        Self { delay_scale }
    }

    /// Executor that never sleeps.
    pub const fn instant() -> Self {
        Self { delay_scale: 0.0 }
    }

    pub const fn delay_scale(&self) -> f64 {
        self.delay_scale
    }

    /// Delay applied before running `step`. Saturates at `Duration::MAX`.
    pub fn delay_for(&self, step: &Step) -> Duration {
        if self.delay_scale == 0.0 {
            return Duration::ZERO;
        }
        let secs = step.nominal_duration().as_secs_f64() * self.delay_scale;
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[async_trait]
impl StepExecutor for SimulatedExecutor {
    async fn execute(&self, step: &Step) -> Result<StepResult, StepFailure> {
        let delay = self.delay_for(step);
        info!(step = step.name(), ?delay, "Starting step");

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match step.run().await {
            Ok(result) => {
                info!(step = step.name(), status = %result, "Step finished");
                Ok(result)
            }
            Err(cause) => {
                debug!(step = step.name(), %cause, "Step failed");
                Err(StepFailure::new(step.name(), cause))
            }
        }
    }
}
