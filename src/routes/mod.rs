//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API (`/ask`, `/health`, `/debug/schema`) and
//! serves the compiled query console from `STATIC_DIR` for every other path.

pub mod ask;
pub mod health;

use axum::Router;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// JSON API routes.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ask", post(ask::ask))
        .route("/health", get(health::health))
        .route("/debug/schema", get(health::debug_schema))
        .layer(cors)
        .with_state(state)
}

/// Full application router: API plus the static console as fallback.
pub fn app(state: AppState) -> Router {
    let console = ServeDir::new(&state.config.static_dir).append_index_html_on_directories(true);
    api_routes(state)
        .fallback_service(console)
        .layer(TraceLayer::new_for_http())
}

/// Serialize `body` with an explicit UTF-8 JSON content type.
pub(crate) fn json_utf8<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))], bytes).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "response serialization failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
