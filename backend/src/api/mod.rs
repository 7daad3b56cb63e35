pub mod despachos;
pub mod service;
pub mod sessions;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        // Service hours
        .route("/api/service/status", get(service::status))
        // Form sessions
        .route("/api/sessions", post(sessions::create))
        .route(
            "/api/sessions/:id",
            get(sessions::get_one).delete(sessions::discard),
        )
        .route("/api/sessions/:id/events", post(sessions::apply_event))
        .route("/api/sessions/:id/submit", post(sessions::submit))
        // One-shot submission for clients that keep form state locally
        .route("/api/despachos", post(despachos::create))
        .with_state(state)
}
