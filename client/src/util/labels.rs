//! Russian UI strings, field labels and date formatting.
//!
//! DESIGN
//! ======
//! Every user-visible string of the console lives here so the console logic
//! and the renderer stay free of literals. Unknown keys pass through as-is.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

#[cfg(test)]
#[path = "labels_test.rs"]
mod labels_test;

pub const SUBMIT_READY: &str = "Отправить запрос";
pub const SUBMIT_NEEDS_ID: &str = "Отправить запрос (требуется User ID)";
pub const SUBMITTING: &str = "Отправка...";
pub const IDENTIFIER_NOT_SET: &str = "не установлен";
pub const ENTER_IDENTIFIER: &str = "Пожалуйста, введите User ID";
pub const SET_IDENTIFIER_FIRST: &str = "Пожалуйста, сначала установите User ID";
pub const INVALID_IDENTIFIER: &str = "User ID должен быть целым числом";
pub const NOT_SPECIFIED_HTML: &str = "<em>не указано</em>";
pub const NO_RESULTS: &str = "По вашему запросу задач не найдено.";
pub const YES: &str = "Да";
pub const NO: &str = "Нет";

/// Transient banner shown after the identifier is saved.
pub fn identifier_saved(id: &str) -> String {
    format!("User ID {id} успешно сохранен! Теперь вы можете запрашивать свои задачи.")
}

/// Display name for a record field.
pub fn field_label(key: &str) -> &str {
    match key {
        "id" => "ID",
        "title" => "Название",
        "description" => "Описание",
        "status" => "Статус",
        "priority" => "Приоритет",
        "created_at" => "Дата создания",
        "assigned_to" => "Исполнитель",
        "user_id" => "User ID",
        other => other,
    }
}

pub fn status_label(status: &str) -> &str {
    match status {
        "pending" => "Ожидает",
        "in_progress" => "В процессе",
        "completed" => "Завершена",
        other => other,
    }
}

pub fn priority_label(priority: &str) -> &str {
    match priority {
        "low" => "Низкий",
        "medium" => "Средний",
        "high" => "Высокий",
        other => other,
    }
}

// =============================================================================
// DATES
// =============================================================================

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse the timestamp shapes Postgres JSON produces. Offsets are kept as
/// written, not converted to the viewer's zone.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format("%d.%m.%Y, %H:%M:%S").to_string()
}

/// Render a date value as `DD.MM.YYYY, HH:MM:SS`. Numbers are epoch
/// milliseconds. Anything unparseable is returned unchanged.
pub fn format_date(value: &Value) -> String {
    match value {
        Value::String(raw) => parse_timestamp(raw).map_or_else(|| raw.clone(), format_timestamp),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map_or_else(|| n.to_string(), |dt| format_timestamp(dt.naive_utc())),
        other => other.to_string(),
    }
}
