//! cortex-server
//!
//! HTTP surface for the prompt-to-preview pipeline: the one-shot
//! `generate-code` endpoint and session routes that drive generation,
//! preview and error relay end to end.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;

/// Build the router with CORS and audit logging applied.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/generate-code", post(routes::generate::generate_code))
        .route(
            "/sessions",
            get(routes::sessions::list_sessions).post(routes::sessions::create_session),
        )
        .route(
            "/sessions/{id}",
            get(routes::sessions::get_session).delete(routes::sessions::delete_session),
        )
        .route("/sessions/{id}/prompt", post(routes::sessions::submit_prompt))
        .route("/sessions/{id}/fix", post(routes::sessions::fix_errors))
        .route("/sessions/{id}/errors", post(routes::sessions::report_error))
        .route("/sessions/{id}/refresh", post(routes::sessions::refresh))
        .route("/sessions/{id}/preview", get(routes::sessions::preview_page))
        .route("/sessions/{id}/document", get(routes::sessions::preview_document))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
