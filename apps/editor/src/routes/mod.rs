pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::editor::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/editor/templates", get(handlers::handle_list_templates))
        // Session lifecycle
        .route("/api/v1/editor/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/editor/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/editor/sessions/:id/notice",
            axum::routing::delete(handlers::handle_dismiss_notice),
        )
        .route(
            "/api/v1/editor/sessions/:id/document",
            get(handlers::handle_get_document),
        )
        .route("/api/v1/editor/sessions/:id/mode", put(handlers::handle_set_mode))
        .route(
            "/api/v1/editor/sessions/:id/template",
            put(handlers::handle_set_template),
        )
        // Section forms
        .route(
            "/api/v1/editor/sessions/:id/sections/:section",
            get(handlers::handle_get_section).put(handlers::handle_replace_section),
        )
        .route(
            "/api/v1/editor/sessions/:id/sections/:section/items",
            post(handlers::handle_append_item),
        )
        .route(
            "/api/v1/editor/sessions/:id/sections/:section/items/:item_id",
            axum::routing::delete(handlers::handle_remove_item),
        )
        .route(
            "/api/v1/editor/sessions/:id/sections/:section/items/:item_id/current",
            put(handlers::handle_set_current),
        )
        .route(
            "/api/v1/editor/sessions/:id/sections/:section/expanded",
            put(handlers::handle_set_expanded),
        )
        // Preview, export, save
        .route("/api/v1/editor/sessions/:id/preview", get(handlers::handle_preview))
        .route("/api/v1/editor/sessions/:id/pdf", get(handlers::handle_export_pdf))
        .route("/api/v1/editor/sessions/:id/save", post(handlers::handle_save))
        .with_state(state)
}
