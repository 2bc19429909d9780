//! HTML rendering of `/ask` results.
//!
//! Every value that came from the server or the user is passed through
//! [`escape_html`] before interpolation. Only the fixed markup and the
//! label tables in [`super::labels`] are emitted raw.

use serde_json::{Map, Value};

use super::html::escape_html;
use super::labels::{NO, NO_RESULTS, NOT_SPECIFIED_HTML, YES, field_label, format_date, priority_label, status_label};
use crate::net::types::{AskResponse, UserInfo};

#[cfg(test)]
#[path = "response_html_test.rs"]
mod response_html_test;

pub const LOADING_HTML: &str = r#"<div class="loading">Loading...</div>"#;

/// Error block shown in the result area.
pub fn render_error(message: &str) -> String {
    format!(r#"<div class="error"><strong>Error:</strong> {}</div>"#, escape_html(message))
}

/// Render a full `/ask` response: statistics, query info, then records.
pub fn render_response(resp: &AskResponse) -> String {
    let mut html = String::new();
    if let Some(info) = &resp.user_info {
        html.push_str(&render_user_stats(info));
    }
    html.push_str(&render_query_info(resp));
    match resp.rows.as_deref() {
        Some(rows) if !rows.is_empty() => html.push_str(&render_rows(rows)),
        _ => {
            html.push_str(r#"<div class="response-block"><h4>📂 Результаты</h4>"#);
            html.push_str(&format!("<p>{NO_RESULTS}</p></div>"));
        }
    }
    html
}

fn render_user_stats(info: &UserInfo) -> String {
    format!(
        concat!(
            r#"<div class="user-stats"><h4>📊 Статистика пользователя #{}</h4>"#,
            r#"<div class="stats-grid">"#,
            r#"<div class="stat-item"><div class="stat-value">{}</div><div class="stat-label">Всего задач</div></div>"#,
            r#"<div class="stat-item"><div class="stat-value">{}</div><div class="stat-label">Найдено по запросу</div></div>"#,
            "</div></div>"
        ),
        info.user_id, info.total_tasks, info.filtered_tasks
    )
}

fn data_field(name: &str, value_class: &str, value_html: &str) -> String {
    format!(
        r#"<div class="data-field"><span class="field-name">{name}:</span><span class="{value_class}">{value_html}</span></div>"#
    )
}

fn render_query_info(resp: &AskResponse) -> String {
    let mut html = String::from(r#"<div class="response-block"><h4>📋 Информация о запросе</h4>"#);
    html.push_str(&data_field("SQL запрос", "field-value", &escape_html(resp.sql.as_deref().unwrap_or_default())));
    html.push_str(&data_field(
        "Объяснение",
        "field-value",
        &escape_html(resp.explanation.as_deref().unwrap_or_default()),
    ));
    let needs = if resp.needs_clarification.unwrap_or(false) { YES } else { NO };
    html.push_str(&data_field("Требует уточнения", "field-value", needs));
    if let Some(question) = resp.clarification_question.as_deref().filter(|q| !q.is_empty()) {
        html.push_str(&data_field("Вопрос для уточнения", "field-value", &escape_html(question)));
    }
    html.push_str("</div>");
    html
}

fn render_rows(rows: &[Map<String, Value>]) -> String {
    let mut html = format!(r#"<div class="response-block"><h4>📂 Результаты ({} задач)</h4>"#, rows.len());
    for row in rows {
        html.push_str(&render_record(row));
    }
    html.push_str("</div>");
    html
}

/// Plain text of a scalar the way it reads in a form field.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a status value deserves a badge: present, non-empty, non-zero.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn render_record(row: &Map<String, Value>) -> String {
    let id = row.get("id").filter(|v| !v.is_null()).map(scalar_text).unwrap_or_default();
    let mut html = format!(r#"<div class="data-block"><h5>🎯 Задача #{}"#, escape_html(&id));
    if let Some(status) = row.get("status").filter(|v| is_truthy(v)).map(scalar_text) {
        html.push_str(&format!(
            r#" <span class="status-badge status-{}">{}</span>"#,
            escape_html(&status),
            escape_html(status_label(&status))
        ));
    }
    html.push_str("</h5>");
    for (key, value) in row {
        let (value_class, value_html) = render_value(key, value);
        html.push_str(&data_field(&escape_html(field_label(key)), &value_class, &value_html));
    }
    html.push_str("</div>");
    html
}

/// Class and escaped markup for one record field.
fn render_value(key: &str, value: &Value) -> (String, String) {
    let mut class = String::from("field-value");
    if key == "priority" && !value.is_null() {
        class.push_str(&format!(" priority-{}", escape_html(&scalar_text(value))));
    }
    let html = match value {
        Value::Null => NOT_SPECIFIED_HTML.to_owned(),
        Value::Object(_) | Value::Array(_) => {
            let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            format!("<pre>{}</pre>", escape_html(&pretty))
        }
        scalar => {
            let text = scalar_text(scalar);
            let shown = match key {
                "priority" => priority_label(&text).to_owned(),
                "status" => status_label(&text).to_owned(),
                "created_at" => format_date(scalar),
                _ => text,
            };
            escape_html(&shown)
        }
    };
    (class, html)
}
