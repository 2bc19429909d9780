//! Wire types exchanged with the `/ask` and `/health` endpoints.
//!
//! Response fields are all optional: the renderer shows whatever subset the
//! server sent. Rows keep the server's column order (`preserve_order`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: i64,
}

/// Body of `POST /ask`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    pub question: String,
    pub identity: Identity,
}

impl AskRequest {
    pub fn new(question: impl Into<String>, user_id: i64) -> Self {
        Self { question: question.into(), identity: Identity { user_id } }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub total_tasks: i64,
    pub filtered_tasks: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub user_info: Option<UserInfo>,
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub needs_clarification: Option<bool>,
    #[serde(default)]
    pub clarification_question: Option<String>,
    #[serde(default)]
    pub rows: Option<Vec<Map<String, Value>>>,
}

/// Error body shared by `/ask` and `/health`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HealthBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}
