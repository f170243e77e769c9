//! Text framing for the event stream.
//!
//! Each event becomes two lines followed by a blank line:
//!
//! ```text
//! event: <kind>
//! data: <single-line JSON payload>
//!
//! ```
//!
//! Heartbeats are comment lines carrying [`HEARTBEAT_TEXT`] and no payload.

use thiserror::Error;

use super::TaskEvent;

/// Media type advertised for the stream.
pub const CONTENT_TYPE: &str = "text/event-stream";

/// Text of the keep-alive comment.
pub const HEARTBEAT_TEXT: &str = "ping";

/// Errors while framing an event.
#[derive(Debug, Error)]
pub enum WireError {
    /// The payload could not be serialized. Indicates a programming defect.
    #[error("failed to serialize {kind} payload: {source}")]
    Payload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Render one event as a complete frame.
pub fn encode_frame(event: &TaskEvent) -> Result<String, WireError> {
    let kind = event.kind().as_str();
    let data = event
        .payload_json()
        .map_err(|source| WireError::Payload { kind, source })?;
    Ok(format!("event: {kind}\ndata: {data}\n\n"))
}
