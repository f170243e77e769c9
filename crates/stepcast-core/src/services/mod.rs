//! Core services: step execution, orchestration and the built-in task.

mod arithmetic;
mod executor;
mod orchestrator;

pub use arithmetic::{ArithmeticOp, MAX_DELAY_SCALE, TaskConfig, arithmetic_task};
pub use executor::SimulatedExecutor;
pub use orchestrator::{RunState, TaskRun};
