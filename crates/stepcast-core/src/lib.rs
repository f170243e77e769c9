//! Core domain for stepcast.
//!
//! Streams the progress of a multi-step task as discrete named events.
//! This crate holds the transport-agnostic pieces: step and task types,
//! event encoders and wire framing, the executor and disconnection monitor
//! ports, and the [`TaskRun`] state machine that ties them together.
//! Adapters (HTTP, CLI) drive a `TaskRun` and deliver its events.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{Step, StepError, StepResult, StepWork, StreamSession, Task, TaskError};
pub use events::{
    CompletionEvent, ErrorEvent, EventKind, ProgressEvent, StepSummary, TaskEvent, wire,
};
pub use ports::{
    AlwaysConnected, CoreError, DisconnectionMonitor, StepExecutor, StepFailure, TokenMonitor,
};
pub use services::{
    ArithmeticOp, MAX_DELAY_SCALE, RunState, SimulatedExecutor, TaskConfig, TaskRun,
    arithmetic_task,
};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
