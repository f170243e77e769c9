//! HTTP request handlers for the Axum web server.
//!
//! Handlers are thin wrappers that build a run and hand it to the SSE
//! transport.

pub mod progress;
