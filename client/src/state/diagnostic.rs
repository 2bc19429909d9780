//! Health-check popup state.
//!
//! DESIGN
//! ======
//! One [`DiagnosticModal`] is created when the console starts and reused for
//! every check: presenting a report replaces its title and body and makes it
//! visible, dismissing only hides it.

use crate::util::html::escape_html;

#[cfg(test)]
#[path = "diagnostic_test.rs"]
mod diagnostic_test;

pub const HEALTHY_TITLE: &str = "✅ Статус системы";
pub const ERROR_TITLE: &str = "❌ Ошибка";

/// Outcome of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HealthReport {
    Healthy { status: String },
    /// Non-2xx reply; `detail` is the server's message, if any.
    ServerError { detail: Option<String> },
    Unreachable { reason: String },
}

impl HealthReport {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Healthy { .. } => HEALTHY_TITLE,
            Self::ServerError { .. } | Self::Unreachable { .. } => ERROR_TITLE,
        }
    }

    /// Popup body markup with every server-provided value escaped.
    pub fn body_html(&self) -> String {
        match self {
            Self::Healthy { status } => {
                format!("Сервер работает нормально<br><strong>Статус:</strong> {}", escape_html(status))
            }
            Self::ServerError { detail } => format!(
                "Проблема с сервером: {}",
                escape_html(detail.as_deref().unwrap_or("Неизвестная ошибка"))
            ),
            Self::Unreachable { reason } => {
                format!("Не удалось подключиться к серверу: {}", escape_html(reason))
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticModal {
    pub title: String,
    pub body_html: String,
    pub visible: bool,
}

impl DiagnosticModal {
    pub fn present(&mut self, report: &HealthReport) {
        report.title().clone_into(&mut self.title);
        self.body_html = report.body_html();
        self.visible = true;
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }
}
