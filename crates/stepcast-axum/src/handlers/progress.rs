//! Progress stream handler.
//!
//! Every request starts one fresh task and streams its events until the
//! task completes, fails, or the client goes away.

use axum::extract::State;
use axum::response::sse::Sse;
use futures_util::stream::Stream;
use stepcast_core::arithmetic_task;
use tracing::debug;

use crate::error::HttpError;
use crate::sse::{self, SseItem};
use crate::state::AppState;

/// SSE progress stream endpoint.
///
/// Emits one `progress` event per completed step, then a single `complete`
/// or `error` event, then closes.
pub async fn stream(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = SseItem> + Send + 'static>, HttpError> {
    let task = arithmetic_task(&state.task)?;
    debug!(steps = task.len(), "Opening progress stream");

    let events = sse::stream_task(task, state.executor.clone(), state.channel_capacity);
    Ok(sse::into_response(events, state.keep_alive))
}
