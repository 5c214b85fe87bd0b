use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Voice capture control
        .route("/capture/start", post(handlers::start_capture))
        .route("/capture/stop", post(handlers::stop_capture))
        .route("/capture/discard", post(handlers::discard_capture))
        .route("/capture/playback", post(handlers::toggle_playback))
        .route("/capture/status", get(handlers::capture_status))
        // Dream journal
        .route("/dreams", post(handlers::save_dream).get(handlers::list_dreams))
        // Sleep log
        .route("/sleep", post(handlers::add_sleep).get(handlers::list_sleep))
        .route("/sleep/summary", get(handlers::sleep_summary))
        // Interpretation chat
        .route("/interpret", post(handlers::submit_interpretation))
        .route("/interpret/messages", get(handlers::interpretation_messages))
        // Middleware: request logging + permissive CORS for the web client
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
