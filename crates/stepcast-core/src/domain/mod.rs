//! Domain types: steps, tasks and the per-connection session.

mod session;
mod step;
mod task;

pub use session::StreamSession;
pub use step::{Step, StepError, StepResult, StepWork};
pub use task::{Task, TaskError};
