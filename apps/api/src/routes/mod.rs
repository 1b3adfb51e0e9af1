pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/form",
            get(handlers::handle_get_form).put(handlers::handle_apply_form),
        )
        // Repeatable entries
        .route(
            "/api/v1/sessions/:id/entries/:category",
            post(handlers::handle_add_entry),
        )
        .route(
            "/api/v1/sessions/:id/entries/:category/:entry_id",
            delete(handlers::handle_remove_entry),
        )
        // Preview + export
        .route(
            "/api/v1/sessions/:id/preview",
            get(handlers::handle_get_preview).post(handlers::handle_submit),
        )
        .route("/api/v1/sessions/:id/export", post(handlers::handle_export))
        .with_state(state)
}
