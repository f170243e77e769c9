//! Task: a validated, ordered sequence of steps.

use std::collections::HashSet;

use thiserror::Error;

use super::step::Step;

/// Errors raised while assembling a task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// A task needs at least one step.
    #[error("task has no steps")]
    Empty,

    /// Step names key the completion summary and must be unique.
    #[error("duplicate step name: {0}")]
    DuplicateStep(String),
}

/// An ordered sequence of steps, fixed at construction.
///
/// Steps execute strictly in the stored order; progress percentages are
/// relative to the number of steps completed so far.
#[derive(Debug, Clone)]
pub struct Task {
    steps: Vec<Step>,
}

impl Task {
    /// Build a task from its steps.
    pub fn new(steps: Vec<Step>) -> Result<Self, TaskError> {
        if steps.is_empty() {
            return Err(TaskError::Empty);
        }

        let mut seen = HashSet::with_capacity(steps.len());
        for step in &steps {
            if !seen.insert(step.name()) {
                return Err(TaskError::DuplicateStep(step.name().to_string()));
            }
        }

        Ok(Self { steps })
    }

    /// The steps, in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps. Always at least one.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`, if any.
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Display labels in execution order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(Step::label)
    }
}
