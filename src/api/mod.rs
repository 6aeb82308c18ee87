//! HTTP API module
//!
//! Exposes the floating window's timer actions and the editor's
//! snapshot exchange as JSON endpoints.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(timers_handler).post(add_timer_handler))
        .route("/timers/:index", delete(remove_timer_handler))
        .route("/timers/:index/toggle", post(toggle_handler))
        .route("/timers/:index/reset", post(reset_handler))
        .route("/timers/:index/archive", post(archive_handler))
        .route("/timers/:index/unarchive", post(unarchive_handler))
        // editor bridge
        .route("/editor/open", post(open_editor_handler))
        .route("/editor/close", post(close_editor_handler))
        .route("/snapshot", get(get_snapshot_handler).put(save_snapshot_handler))
        .route("/settings", get(settings_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
