//! HTTP calls made by the query console.
//!
//! Client-side (`csr`): real HTTP calls via `gloo-net`.
//! Native builds: [`HttpApi`] reports [`ApiError::Unavailable`] since the
//! endpoints are only reachable from the browser.
//!
//! ERROR HANDLING
//! ==============
//! Status and body interpretation is split into pure functions
//! ([`interpret_ask_reply`], [`interpret_health_reply`]) so every outcome the
//! console renders is testable without a network.

#![allow(clippy::unused_async)]

use super::types::{AskRequest, AskResponse, ErrorBody, HealthBody};
use crate::state::diagnostic::HealthReport;

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

pub const ASK_ENDPOINT: &str = "/ask";
pub const HEALTH_ENDPOINT: &str = "/health";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Не удалось подключиться к серверу: {0}")]
    Network(String),
    /// Non-2xx reply; carries the server's `detail` or a generic message.
    #[error("{0}")]
    Server(String),
    /// The reply was not the JSON shape the console expects.
    #[error("Некорректный ответ сервера: {0}")]
    Decode(String),
    #[error("HTTP is only available in the browser")]
    Unavailable,
}

/// Network seam of the console, implemented over HTTP in the browser and
/// scripted in tests.
#[async_trait::async_trait(?Send)]
pub trait ConsoleApi {
    /// Send a question to `POST /ask`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for transport failures, non-2xx replies and
    /// undecodable bodies.
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ApiError>;

    /// Probe `GET /health`. Every outcome, including transport failure, is a
    /// report.
    async fn health(&self) -> HealthReport;
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Turn an `/ask` reply into a response or an error.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] for non-JSON bodies or a success body of the
/// wrong shape, and [`ApiError::Server`] for non-2xx replies.
pub fn interpret_ask_reply(status: u16, body: &str) -> Result<AskResponse, ApiError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if !is_success(status) {
        let detail = serde_json::from_value::<ErrorBody>(value)
            .ok()
            .and_then(|b| b.detail)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "Request failed".to_owned());
        return Err(ApiError::Server(detail));
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Turn a `/health` reply into a report.
pub fn interpret_health_reply(status: u16, body: &str) -> HealthReport {
    match serde_json::from_str::<HealthBody>(body) {
        Err(e) => HealthReport::Unreachable { reason: e.to_string() },
        Ok(parsed) if is_success(status) => HealthReport::Healthy { status: parsed.status.unwrap_or_default() },
        Ok(parsed) => HealthReport::ServerError { detail: parsed.detail.filter(|d| !d.is_empty()) },
    }
}

/// Same-origin HTTP client for the console endpoints.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpApi;

#[async_trait::async_trait(?Send)]
impl ConsoleApi for HttpApi {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ApiError> {
        #[cfg(feature = "csr")]
        {
            let resp = gloo_net::http::Request::post(ASK_ENDPOINT)
                .json(request)
                .map_err(|e| ApiError::Network(e.to_string()))?
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            let status = resp.status();
            let body = resp.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
            log::debug!("{ASK_ENDPOINT} replied {status}");
            interpret_ask_reply(status, &body)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = request;
            Err(ApiError::Unavailable)
        }
    }

    async fn health(&self) -> HealthReport {
        #[cfg(feature = "csr")]
        {
            let resp = match gloo_net::http::Request::get(HEALTH_ENDPOINT).send().await {
                Ok(resp) => resp,
                Err(e) => return HealthReport::Unreachable { reason: e.to_string() },
            };
            let status = resp.status();
            match resp.text().await {
                Ok(body) => interpret_health_reply(status, &body),
                Err(e) => HealthReport::Unreachable { reason: e.to_string() },
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            HealthReport::Unreachable { reason: ApiError::Unavailable.to_string() }
        }
    }
}
