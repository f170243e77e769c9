//! Task orchestration state machine.
//!
//! A [`TaskRun`] drives one task for one client connection:
//!
//! ```text
//! Pending -> Running(0) -> ... -> Running(n-1) -> Finalizing -> Completed
//!                 \                    \               \
//!                  +--------------------+---------------+--> AbortedDisconnected
//!                  +--------------------+--> AbortedFailed
//! ```
//!
//! Each call to [`TaskRun::next_event`] advances the machine until it has one
//! event to hand out or reaches a terminal state. No state is ever revisited.
//! Liveness is sampled before each step and once more before completion; a
//! step already in flight is not interrupted by the machine itself. The
//! transport may drop the pending `next_event` future and call
//! [`TaskRun::abort_disconnected`] when it observes the peer leave mid-step.

use std::sync::Arc;

use futures_util::Stream;
use tracing::{debug, error, info, warn};

use crate::domain::{StreamSession, Task};
use crate::events::{
    GENERIC_ERROR_MESSAGE, StepSummary, TaskEvent, completion_result, encode_completion,
    encode_error, encode_progress, progress_message,
};
use crate::ports::{DisconnectionMonitor, StepExecutor};

/// Lifecycle state of a task run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created, nothing executed yet.
    Pending,
    /// About to run, or running, the step at this index.
    Running { step: usize },
    /// All steps done; the final liveness check is pending.
    Finalizing,
    Completed,
    AbortedDisconnected,
    AbortedFailed,
}

impl RunState {
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::AbortedDisconnected | Self::AbortedFailed
        )
    }
}

/// One run of a task, bound to one client connection.
pub struct TaskRun {
    task: Task,
    session: StreamSession,
    executor: Arc<dyn StepExecutor>,
    monitor: Arc<dyn DisconnectionMonitor>,
    state: RunState,
    summary: StepSummary,
}

impl TaskRun {
    pub fn new(
        task: Task,
        executor: Arc<dyn StepExecutor>,
        monitor: Arc<dyn DisconnectionMonitor>,
    ) -> Self {
        let session = StreamSession::new(task.len());
        Self {
            task,
            session,
            executor,
            monitor,
            state: RunState::Pending,
            summary: StepSummary::new(),
        }
    }

    pub const fn state(&self) -> RunState {
        self.state
    }

    pub const fn session(&self) -> &StreamSession {
        &self.session
    }

    /// Results of the steps completed so far, keyed by step name.
    pub const fn summary(&self) -> &StepSummary {
        &self.summary
    }

    /// Advance to the next event.
    ///
    /// Returns `None` once the run has reached a terminal state. Dropping the
    /// returned future mid-step leaves the run in `Running`; follow up with
    /// [`abort_disconnected`](Self::abort_disconnected).
    pub async fn next_event(&mut self) -> Option<TaskEvent> {
        loop {
            match self.state {
                RunState::Pending => {
                    info!(
                        session = %self.session.id(),
                        total_steps = self.task.len(),
                        "Client connected, starting task run"
                    );
                    self.state = RunState::Running { step: 0 };
                }
                RunState::Running { step } => return self.run_step(step).await,
                RunState::Finalizing => return self.finish(),
                RunState::Completed
                | RunState::AbortedDisconnected
                | RunState::AbortedFailed => return None,
            }
        }
    }

    /// Force the run into `AbortedDisconnected`.
    ///
    /// Used when the transport notices the peer leave while a step is
    /// suspended. No-op once the run is terminal.
    pub fn abort_disconnected(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.session.observe_connection(false);
        warn!(
            session = %self.session.id(),
            state = ?self.state,
            steps_completed = self.session.steps_completed(),
            "Task run cancelled, client went away"
        );
        self.terminate(RunState::AbortedDisconnected);
    }

    /// Turn the run into a lazy, non-restartable stream of events.
    pub fn into_stream(self) -> impl Stream<Item = TaskEvent> + Send + 'static {
        let mut run = self;
        async_stream::stream! {
            while let Some(event) = run.next_event().await {
                yield event;
            }
        }
    }

    async fn run_step(&mut self, index: usize) -> Option<TaskEvent> {
        let Some(step) = self.task.step(index).cloned() else {
            // Unreachable for a validated task; treat as an exhausted sequence.
            self.state = RunState::Finalizing;
            return self.finish();
        };

        if !self.sample_connection() {
            warn!(
                session = %self.session.id(),
                step = step.name(),
                "Client disconnected before step"
            );
            self.terminate(RunState::AbortedDisconnected);
            return None;
        }

        match self.executor.execute(&step).await {
            Ok(result) => {
                let completed = self.session.record_completion();
                let total = self.session.total_steps();
                let message = progress_message(step.label(), &result);
                let event = encode_progress(completed, total, message);
                self.summary.insert(step.name().to_string(), result);

                info!(
                    session = %self.session.id(),
                    step = step.name(),
                    percent = event.percent,
                    "Sent progress"
                );

                self.state = if index + 1 < total {
                    RunState::Running { step: index + 1 }
                } else {
                    RunState::Finalizing
                };
                Some(event.into())
            }
            Err(failure) => {
                error!(
                    session = %self.session.id(),
                    step = %failure.step_name,
                    cause = %failure.cause,
                    "Step failed, aborting task run"
                );
                self.terminate(RunState::AbortedFailed);

                if self.sample_connection() {
                    Some(encode_error(GENERIC_ERROR_MESSAGE, failure.to_string()).into())
                } else {
                    debug!(session = %self.session.id(), "Client gone, dropping error event");
                    None
                }
            }
        }
    }

    fn finish(&mut self) -> Option<TaskEvent> {
        if !self.sample_connection() {
            warn!(
                session = %self.session.id(),
                "Client disconnected just before completion"
            );
            self.terminate(RunState::AbortedDisconnected);
            return None;
        }

        let result = completion_result(self.task.labels());
        let event = encode_completion(result, self.summary.clone());
        self.terminate(RunState::Completed);
        Some(event.into())
    }

    fn sample_connection(&mut self) -> bool {
        let alive = self.monitor.is_connected();
        self.session.observe_connection(alive)
    }

    fn terminate(&mut self, state: RunState) {
        debug_assert!(state.is_terminal());
        self.state = state;
        info!(
            session = %self.session.id(),
            state = ?state,
            steps_completed = self.session.steps_completed(),
            total_steps = self.session.total_steps(),
            elapsed_ms = self.session.elapsed().num_milliseconds(),
            "Task run finished"
        );
    }
}

impl std::fmt::Debug for TaskRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRun")
            .field("session", &self.session)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
