//! Liveness and schema diagnostics.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::json;

use super::json_utf8;
use crate::state::AppState;

/// Table names listed by `/debug/schema`.
const DEBUG_TABLES_SHOWN: usize = 50;

/// `GET /health`
pub async fn health() -> Response {
    json_utf8(StatusCode::OK, &json!({"status": "ok"}))
}

/// `GET /debug/schema`: load the schema cache if needed and summarize it.
pub async fn debug_schema(State(state): State<AppState>) -> Response {
    match state.schema().await {
        Ok(schema) => {
            let tables: Vec<&str> = schema.tables.keys().take(DEBUG_TABLES_SHOWN).map(String::as_str).collect();
            json_utf8(
                StatusCode::OK,
                &json!({
                    "loaded": true,
                    "tables_count": schema.tables.len(),
                    "tables": tables,
                    "fks_count": schema.foreign_keys.len(),
                }),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "schema load failed");
            json_utf8(StatusCode::INTERNAL_SERVER_ERROR, &json!({"loaded": false, "error": e.to_string()}))
        }
    }
}
