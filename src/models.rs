//! Wire types for the `/ask` endpoint.
//!
//! DESIGN
//! ======
//! Rows are generated by arbitrary SQL, so they stay as JSON objects
//! (`serde_json` with `preserve_order`) and keep the column order Postgres
//! returned them in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Largest `limit` a caller may request.
pub const MAX_LIMIT: u32 = 10_000;

/// Who is asking. Missing company/department are filled from `public.users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub identity: Identity,
    /// Absent means [`AskRequest::effective_limit`] picks the server default.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl AskRequest {
    /// Validate field ranges not expressible in serde.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when `limit` is out of range.
    pub fn validate(&self) -> Result<(), String> {
        match self.limit {
            Some(limit) if !(1..=MAX_LIMIT).contains(&limit) => {
                Err(format!("limit must be between 1 and {MAX_LIMIT}, got {limit}"))
            }
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn effective_limit(&self, default_limit: u32) -> u32 {
        self.limit.unwrap_or(default_limit)
    }
}

/// Urlencoded body posted by a plain HTML form.
#[derive(Debug, Clone, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub user_id: String,
}

impl AskForm {
    /// Convert to an [`AskRequest`]; a blank `user_id` becomes 0.
    ///
    /// # Errors
    ///
    /// Returns a message when `user_id` is not an integer.
    pub fn into_request(self) -> Result<AskRequest, String> {
        let raw = self.user_id.trim();
        let user_id = if raw.is_empty() {
            0
        } else {
            raw.parse::<i64>()
                .map_err(|e| format!("user_id: {e}"))?
        };
        Ok(AskRequest {
            question: self.question,
            identity: Identity { user_id, ..Identity::default() },
            limit: None,
        })
    }
}

/// Output of the SQL generator, before the safety gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedSql {
    pub sql: String,
    pub needs_clarification: bool,
    pub clarification_question: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub total_tasks: i64,
    pub filtered_tasks: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub sql: String,
    pub needs_clarification: bool,
    pub clarification_question: String,
    pub rows: Vec<Map<String, Value>>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
}

/// Human-readable summary sent with every successful answer.
#[must_use]
pub fn explanation(question: &str, row_count: usize) -> String {
    format!("Выполнен запрос: {question}. Найдено строк: {row_count}.")
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
