//! Per-connection run context.

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

/// Mutable context of one task run bound to one client connection.
///
/// Created when a stream request arrives and dropped when the run reaches a
/// terminal state. Nothing here is shared between sessions.
#[derive(Debug, Clone)]
pub struct StreamSession {
    id: Uuid,
    total_steps: usize,
    steps_completed: usize,
    /// Last sampled liveness of the peer. Never push-notified.
    connection_alive: bool,
    started_at: DateTime<Utc>,
}

impl StreamSession {
    /// Start a session for a task with `total_steps` steps.
    pub fn new(total_steps: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            total_steps,
            steps_completed: 0,
            connection_alive: true,
            started_at: Utc::now(),
        }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub const fn steps_completed(&self) -> usize {
        self.steps_completed
    }

    pub const fn connection_alive(&self) -> bool {
        self.connection_alive
    }

    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Wall-clock time since the session started.
    pub fn elapsed(&self) -> TimeDelta {
        Utc::now() - self.started_at
    }

    /// Record one more completed step and return the new count.
    pub(crate) fn record_completion(&mut self) -> usize {
        self.steps_completed = (self.steps_completed + 1).min(self.total_steps);
        self.steps_completed
    }

    /// Store the latest liveness sample and return it.
    pub(crate) fn observe_connection(&mut self, alive: bool) -> bool {
        self.connection_alive = alive;
        alive
    }
}
