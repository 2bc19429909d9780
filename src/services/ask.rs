//! Ask service: question in, rows out.
//!
//! SYSTEM CONTEXT
//! ==============
//! The `/ask` route parses the body and hands an [`AskRequest`] here. This
//! module resolves the caller against `public.users`, generates SQL, gates it
//! and runs it. Route code only translates [`AskError`] into HTTP.

use serde_json::{Map, Value};

use super::safety::is_safe_select;
use super::schema::SchemaError;
use super::sql_generator::generate_sql;
use crate::db;
use crate::models::{AskRequest, AskResponse, Identity, UserInfo, explanation};
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum AskError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Failed to load schema: {0}")]
    SchemaLoad(#[from] SchemaError),
    #[error("Schema is empty. Check POSTGRES_DSN and that your database has tables.")]
    EmptySchema,
    #[error("Failed to look up user: {0}")]
    UserLookup(sqlx::Error),
    #[error("Unknown user_id")]
    UnknownUser,
    #[error("Unsafe or empty SQL")]
    UnsafeSql { sql: String },
    #[error("SQL execution error: {source}")]
    Execution { sql: String, source: sqlx::Error },
}

impl AskError {
    /// Generated SQL worth echoing back to the caller, if any.
    #[must_use]
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::UnsafeSql { sql } | Self::Execution { sql, .. } => Some(sql),
            _ => None,
        }
    }

    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::EmptySchema => Some("export POSTGRES_DSN=postgresql://localhost:5432/tasks and restart app"),
            _ => None,
        }
    }
}

/// Fill `company_id` / `department_id` from the user row when the request
/// left them out. Non-integer columns are ignored.
pub fn merge_identity(identity: &mut Identity, user_row: &Value) {
    if identity.company_id.is_none() {
        identity.company_id = user_row.get("company_id").and_then(Value::as_i64);
    }
    if identity.department_id.is_none() {
        identity.department_id = user_row.get("department_id").and_then(Value::as_i64);
    }
}

fn into_objects(rows: Vec<Value>) -> Vec<Map<String, Value>> {
    rows.into_iter()
        .filter_map(|row| match row {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}

/// Run the full `/ask` pipeline for an already-parsed request.
///
/// # Errors
///
/// Returns an [`AskError`] for each stage that can reject the request.
pub async fn answer(state: &AppState, request: AskRequest) -> Result<AskResponse, AskError> {
    request.validate().map_err(AskError::InvalidRequest)?;

    let schema = state.schema().await?;
    if schema.is_empty() {
        return Err(AskError::EmptySchema);
    }

    let mut identity = request.identity.clone();
    let user_row = db::fetch_user(&state.pool, identity.user_id)
        .await
        .map_err(AskError::UserLookup)?
        .ok_or(AskError::UnknownUser)?;
    merge_identity(&mut identity, &user_row);

    let limit = request.effective_limit(state.config.default_limit);
    let generated = generate_sql(&schema, state.llm.as_deref(), &request.question, &identity, limit).await;
    tracing::info!(sql = %generated.sql, needs_clarification = generated.needs_clarification, "sql generated");

    if generated.sql.trim().is_empty() || !is_safe_select(&generated.sql) {
        tracing::warn!(sql = %generated.sql, "rejected unsafe sql");
        return Err(AskError::UnsafeSql { sql: generated.sql });
    }

    let rows = match db::fetch_json_rows(&state.pool, &generated.sql).await {
        Ok(rows) => into_objects(rows),
        Err(source) => return Err(AskError::Execution { sql: generated.sql, source }),
    };

    let user_info = if schema.table_has_column("tasks", "user_id") {
        match db::count_user_tasks(&state.pool, identity.user_id).await {
            Ok(total_tasks) => Some(UserInfo { user_id: identity.user_id, total_tasks, filtered_tasks: rows.len() }),
            Err(e) => {
                tracing::warn!(error = %e, user_id = identity.user_id, "task count failed");
                None
            }
        }
    } else {
        None
    };

    Ok(AskResponse {
        explanation: explanation(&request.question, rows.len()),
        sql: generated.sql,
        needs_clarification: generated.needs_clarification,
        clarification_question: generated.clarification_question,
        rows,
        user_info,
    })
}

#[cfg(test)]
#[path = "ask_test.rs"]
mod tests;
