//! HTTP API server for the web client
//!
//! This module provides a REST API over the capture, journal, and
//! interpretation cores:
//! - POST /capture/{start,stop,discard,playback}, GET /capture/status
//! - POST /dreams, GET /dreams
//! - POST /sleep, GET /sleep, GET /sleep/summary
//! - POST /interpret, GET /interpret/messages
//! - GET /health

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
