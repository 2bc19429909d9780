//! `POST /ask` route.

use axum::extract::{Form, FromRequest, Json, Request, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use serde_json::{Map, Value};
use tracing::Instrument;
use uuid::Uuid;

use super::json_utf8;
use crate::models::{AskForm, AskRequest};
use crate::services::ask::{AskError, answer};
use crate::state::AppState;

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().starts_with("application/json"))
}

/// Parse a JSON body, or an urlencoded form for anything else.
async fn parse_body(request: Request, state: &AppState) -> Result<AskRequest, AskError> {
    if is_json(&request) {
        let Json(body) = Json::<AskRequest>::from_request(request, state)
            .await
            .map_err(|e| AskError::InvalidRequest(e.body_text()))?;
        Ok(body)
    } else {
        let Form(form) = Form::<AskForm>::from_request(request, state)
            .await
            .map_err(|e| AskError::InvalidRequest(e.body_text()))?;
        form.into_request().map_err(AskError::InvalidRequest)
    }
}

pub(crate) fn ask_error_status(err: &AskError) -> StatusCode {
    match err {
        AskError::InvalidRequest(_) | AskError::UnknownUser | AskError::UnsafeSql { .. } | AskError::Execution { .. } => {
            StatusCode::BAD_REQUEST
        }
        AskError::SchemaLoad(_) | AskError::EmptySchema | AskError::UserLookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `{detail, sql?, hint?}` error body.
pub(crate) fn ask_error_response(err: &AskError) -> Response {
    let mut body = Map::new();
    body.insert("detail".into(), Value::String(err.to_string()));
    if let Some(sql) = err.sql() {
        body.insert("sql".into(), Value::String(sql.to_owned()));
    }
    if let Some(hint) = err.hint() {
        body.insert("hint".into(), Value::String(hint.to_owned()));
    }
    json_utf8(ask_error_status(err), &body)
}

/// `POST /ask`: answer a natural-language question with rows.
pub async fn ask(State(state): State<AppState>, request: Request) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("ask", %request_id);

    async move {
        let result = match parse_body(request, &state).await {
            Ok(body) => {
                tracing::info!(user_id = body.identity.user_id, question = %body.question, "ask");
                answer(&state, body).await
            }
            Err(e) => Err(e),
        };
        match result {
            Ok(response) => json_utf8(StatusCode::OK, &response),
            Err(e) => {
                tracing::warn!(error = %e, "ask failed");
                ask_error_response(&e)
            }
        }
    }
    .instrument(span)
    .await
}
