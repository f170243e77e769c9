//! Axum web server adapter for stepcast.
//!
//! Exposes task progress as a Server-Sent Events stream. Each request to
//! `/stream-progress` runs one fresh task; events are flushed to the client
//! as they are produced and the run stops once the client goes away.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for integration test infrastructure
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tokio_test as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod sse;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::create_router;
pub use sse::ChannelMonitor;
pub use state::AppState;
