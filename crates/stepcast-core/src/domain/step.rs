//! Step domain types.
//!
//! A `Step` is one deferred unit of work inside a task. It carries a stable
//! name (used as the summary key), a display label (used in progress
//! messages), the nominal time the work is expected to take, and the work
//! itself behind the [`StepWork`] trait.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a successfully completed step.
///
/// Opaque to the orchestration; it is carried verbatim into the progress
/// message and the completion summary. Serializes as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepResult {
    status_message: String,
}

impl StepResult {
    /// Create a result carrying the given status message.
    pub fn new(status_message: impl Into<String>) -> Self {
        Self {
            status_message: status_message.into(),
        }
    }

    /// The human-readable status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_message)
    }
}

/// Error raised by a piece of step work.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepError {
    /// The operation was attempted on input it cannot handle.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation failed for any other reason.
    #[error("{0}")]
    Failed(String),
}

/// The deferred work behind a step.
///
/// Implementations may suspend for an arbitrary duration. Retries are not
/// the responsibility of the work itself.
#[async_trait]
pub trait StepWork: Send + Sync {
    /// Run the work once.
    async fn run(&self) -> Result<StepResult, StepError>;
}

/// One named unit of work within a task.
#[derive(Clone)]
pub struct Step {
    name: String,
    label: String,
    nominal_duration: Duration,
    work: Arc<dyn StepWork>,
}

impl Step {
    /// Create a step whose label is the capitalised name.
    pub fn new(
        name: impl Into<String>,
        nominal_duration: Duration,
        work: Arc<dyn StepWork>,
    ) -> Self {
        let name = name.into();
        let label = capitalize(&name);
        Self {
            name,
            label,
            nominal_duration,
            work,
        }
    }

    /// Override the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Stable step name, used as the completion summary key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label used in progress messages.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Time the work is expected to take.
    pub const fn nominal_duration(&self) -> Duration {
        self.nominal_duration
    }

    /// Run the underlying work once.
    pub async fn run(&self) -> Result<StepResult, StepError> {
        self.work.run().await
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("nominal_duration", &self.nominal_duration)
            .finish_non_exhaustive()
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    #[async_trait]
    impl StepWork for Fixed {
        async fn run(&self) -> Result<StepResult, StepError> {
            Ok(StepResult::new(self.0))
        }
    }

    #[test]
    fn label_defaults_to_capitalized_name() {
        let step = Step::new("multiply", Duration::ZERO, Arc::new(Fixed("ok")));
        assert_eq!(step.name(), "multiply");
        assert_eq!(step.label(), "Multiply");
    }

    #[test]
    fn label_can_be_overridden() {
        let step = Step::new("div", Duration::ZERO, Arc::new(Fixed("ok"))).with_label("Divide");
        assert_eq!(step.label(), "Divide");
    }

    #[test]
    fn step_result_serializes_as_plain_string() {
        let result = StepResult::new("Sum operation successful");
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, "\"Sum operation successful\"");
    }

    #[tokio::test]
    async fn run_delegates_to_work() {
        let step = Step::new("sum", Duration::ZERO, Arc::new(Fixed("done")));
        assert_eq!(step.run().await.unwrap().status_message(), "done");
    }
}
