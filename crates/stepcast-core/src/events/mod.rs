//! Progress events emitted by a task run.
//!
//! This module is the single source of truth for what a client can receive
//! on the progress stream.
//!
//! # Structure
//!
//! - `encode` - Pure constructors turning run state into events
//! - `wire` - Text framing of events (`event:` / `data:` lines)
//!
//! # Wire Format
//!
//! The event kind travels in the `event:` line; the payload in the `data:`
//! line is one of the structs below and carries only its listed fields:
//!
//! ```text
//! event: progress
//! data: {"percent":33,"message":"Sum Operation Complete. Status: Sum operation successful"}
//! ```

mod encode;
pub mod wire;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::StepResult;

pub use encode::{
    COMPLETION_RESULT_SUFFIX, GENERIC_ERROR_MESSAGE, completion_result, encode_completion,
    encode_error, encode_progress, progress_message, progress_percent,
};

/// Step results keyed by step name.
pub type StepSummary = BTreeMap<String, StepResult>;

/// Payload of a `progress` event. One per completed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Truncated completion percentage in `[0, 100]`.
    pub percent: u8,
    /// Names the step and its status.
    pub message: String,
}

/// Payload of the `complete` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub result: String,
    /// Exactly one entry per step.
    pub summary: StepSummary,
}

/// Payload of the `error` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub error: String,
    pub details: String,
}

/// Wire name of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Progress,
    Complete,
    Error,
}

impl EventKind {
    /// Name written to the `event:` line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Progress => "progress",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any event a task run can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    Progress(ProgressEvent),
    Complete(CompletionEvent),
    Error(ErrorEvent),
}

impl TaskEvent {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Progress(_) => EventKind::Progress,
            Self::Complete(_) => EventKind::Complete,
            Self::Error(_) => EventKind::Error,
        }
    }

    /// `complete` and `error` end the stream.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Error(_))
    }

    /// Serialize the payload to single-line JSON.
    pub fn payload_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Progress(payload) => serde_json::to_string(payload),
            Self::Complete(payload) => serde_json::to_string(payload),
            Self::Error(payload) => serde_json::to_string(payload),
        }
    }
}

impl From<ProgressEvent> for TaskEvent {
    fn from(event: ProgressEvent) -> Self {
        Self::Progress(event)
    }
}

impl From<CompletionEvent> for TaskEvent {
    fn from(event: CompletionEvent) -> Self {
        Self::Complete(event)
    }
}

impl From<ErrorEvent> for TaskEvent {
    fn from(event: ErrorEvent) -> Self {
        Self::Error(event)
    }
}
