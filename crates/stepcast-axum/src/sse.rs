//! SSE transport for task runs.
//!
//! Each stream request gets its own [`TaskRun`] driven by a spawned pump
//! task. The pump pushes events into a bounded channel whose receiver is the
//! response body, so every event is handed to the connection as soon as it
//! is produced and a slow reader applies backpressure to the run.
//!
//! The same channel doubles as the disconnection monitor: once the body is
//! dropped (client gone) the sender reports closed, the run stops before its
//! next step, and any step in flight is cancelled.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, KeepAliveStream, Sse};
use futures_util::stream::Stream;
use stepcast_core::ports::{DisconnectionMonitor, StepExecutor};
use stepcast_core::wire::{HEARTBEAT_TEXT, WireError};
use stepcast_core::{RunState, Task, TaskEvent, TaskRun};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error};

/// Item type of the response body stream.
pub type SseItem = Result<Event, Infallible>;

/// Default number of events buffered between the run and the connection.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Default heartbeat interval.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(15);

/// Disconnection monitor backed by the response channel.
///
/// Reports disconnected once the receiving half (the response body) has
/// been dropped.
#[derive(Debug, Clone)]
pub struct ChannelMonitor {
    sender: mpsc::Sender<SseItem>,
}

impl ChannelMonitor {
    #[must_use]
    pub const fn new(sender: mpsc::Sender<SseItem>) -> Self {
        Self { sender }
    }
}

impl DisconnectionMonitor for ChannelMonitor {
    fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// Convert a task event into an SSE frame (`event:` + single-line `data:`).
pub fn to_sse_event(event: &TaskEvent) -> Result<Event, WireError> {
    let kind = event.kind().as_str();
    let data = event
        .payload_json()
        .map_err(|source| WireError::Payload { kind, source })?;
    Ok(Event::default().event(kind).data(data))
}

/// Start a run for `task` and return the stream of SSE frames it produces.
///
/// The run is spawned onto the runtime and lives until it reaches a
/// terminal state or the returned stream is dropped.
pub fn stream_task(
    task: Task,
    executor: Arc<dyn StepExecutor>,
    capacity: usize,
) -> ReceiverStream<SseItem> {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let monitor = Arc::new(ChannelMonitor::new(sender.clone()));
    let run = TaskRun::new(task, executor, monitor);
    tokio::spawn(pump(run, sender));
    ReceiverStream::new(receiver)
}

/// Wrap a frame stream in an SSE response with heartbeats.
pub fn into_response<S>(stream: S, keep_alive: Duration) -> Sse<KeepAliveStream<S>>
where
    S: Stream<Item = SseItem> + Send + 'static,
{
    Sse::new(stream).keep_alive(KeepAlive::new().interval(keep_alive).text(HEARTBEAT_TEXT))
}

enum Pumped {
    Event(Option<TaskEvent>),
    Closed,
}

/// Drive `run` to a terminal state, forwarding each event to `sender`.
async fn pump(mut run: TaskRun, sender: mpsc::Sender<SseItem>) -> RunState {
    let session = run.session().id();

    loop {
        let next = tokio::select! {
            event = run.next_event() => Pumped::Event(event),
            () = sender.closed() => Pumped::Closed,
        };

        let event = match next {
            Pumped::Event(Some(event)) => event,
            Pumped::Event(None) => break,
            Pumped::Closed => {
                run.abort_disconnected();
                break;
            }
        };

        let frame = match to_sse_event(&event) {
            Ok(frame) => frame,
            Err(err) => {
                error!(%session, %err, "Failed to encode event, closing session");
                if cfg!(debug_assertions) {
                    panic!("event payload failed to encode: {err}");
                }
                run.abort_disconnected();
                break;
            }
        };

        if sender.send(Ok(frame)).await.is_err() {
            debug!(%session, kind = %event.kind(), "Client gone, event dropped");
            run.abort_disconnected();
            break;
        }
    }

    let state = run.state();
    debug!(%session, ?state, "Progress stream closed");
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use stepcast_core::{TaskConfig, arithmetic_task};

    fn instant_task() -> (Task, Arc<dyn StepExecutor>) {
        let config = TaskConfig::default().with_delay_scale(0.0);
        (arithmetic_task(&config).unwrap(), Arc::new(config.executor()))
    }

    #[tokio::test]
    async fn channel_monitor_tracks_receiver() {
        let (sender, receiver) = mpsc::channel(1);
        let monitor = ChannelMonitor::new(sender);
        assert!(monitor.is_connected());

        drop(receiver);
        assert!(!monitor.is_connected());
    }

    #[tokio::test]
    async fn stream_delivers_every_event() {
        let (task, executor) = instant_task();
        let frames: Vec<SseItem> = stream_task(task, executor, 1).collect().await;
        assert_eq!(frames.len(), 4);
    }

    #[tokio::test]
    async fn pump_completes_when_connected() {
        let (task, executor) = instant_task();
        let (sender, mut receiver) = mpsc::channel(8);
        let monitor = Arc::new(ChannelMonitor::new(sender.clone()));
        let run = TaskRun::new(task, executor, monitor);

        let state = pump(run, sender).await;

        assert_eq!(state, RunState::Completed);
        let mut count = 0;
        while receiver.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn pump_stops_when_receiver_is_dropped() {
        let (task, executor) = instant_task();
        let (sender, receiver) = mpsc::channel(8);
        let monitor = Arc::new(ChannelMonitor::new(sender.clone()));
        let run = TaskRun::new(task, executor, monitor);
        drop(receiver);

        let state = pump(run, sender).await;

        assert_eq!(state, RunState::AbortedDisconnected);
    }

    #[tokio::test]
    async fn response_uses_event_stream_content_type() {
        use axum::response::IntoResponse;

        let (task, executor) = instant_task();
        let events = stream_task(task, executor, DEFAULT_CHANNEL_CAPACITY);
        let response = into_response(events, DEFAULT_KEEP_ALIVE).into_response();

        let content_type = response.headers().get(axum::http::header::CONTENT_TYPE);
        assert_eq!(
            content_type.and_then(|v| v.to_str().ok()),
            Some(stepcast_core::wire::CONTENT_TYPE)
        );
    }

    #[test]
    fn sse_frames_carry_kind() {
        let event = TaskEvent::from(stepcast_core::events::encode_progress(1, 3, "Sum"));
        assert!(to_sse_event(&event).is_ok());
    }
}
