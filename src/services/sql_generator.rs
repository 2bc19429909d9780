//! SQL generation for natural-language questions.
//!
//! DESIGN
//! ======
//! Three tiers, tried in order:
//! 1. A rule shortcut for "tasks in <month> <year>" questions, answered with a
//!    half-open `created_at` range on the preferred table.
//! 2. An LLM completion fed with the retrieved schema snippets, replying with
//!    a small JSON object.
//! 3. `SELECT * FROM <table>` (or `SELECT 1 AS ok` when the schema is empty).
//!
//! Whatever tier produced the SQL, the company constraint and the default
//! `LIMIT` are applied afterwards. The result is still untrusted and goes
//! through the safety gate in the `/ask` handler.

use serde::Deserialize;

use super::retriever::{DEFAULT_SNIPPET_COUNT, retrieve_snippets};
use super::safety::{append_company_constraint, ensure_limit};
use super::schema::SchemaCache;
use crate::db::quote_ident;
use crate::llm::types::{LlmChat, LlmError, Message};
use crate::models::{GeneratedSql, Identity};

/// Russian month stems matched by substring, in priority order.
const RU_MONTH_PREFIXES: &[(&str, u32)] = &[
    ("январ", 1),
    ("феврал", 2),
    ("март", 3),
    ("апрел", 4),
    // май / мая
    ("ма", 5),
    ("июн", 6),
    ("июл", 7),
    ("август", 8),
    ("сентябр", 9),
    ("октябр", 10),
    ("ноябр", 11),
    ("декабр", 12),
];

pub const GENERATION_FAILED: &str = "Не удалось сгенерировать SQL. Уточните запрос.";
pub const SCHEMA_UNAVAILABLE: &str = "Схема базы данных недоступна.";

const SYSTEM_PROMPT: &str = "Ты генерируешь Postgres SQL только на основе предоставленной схемы и правил. \
Только SELECT, явные JOIN, не выдумывай таблицы/колонки. Ограничь результат.";

const COMPANY_COLUMN: &str = "company_id";

// =============================================================================
// RULE SHORTCUT
// =============================================================================

/// Find a Russian month name and a `20xx` year anywhere in `text`.
#[must_use]
pub fn parse_month_year(text: &str) -> Option<(i32, u32)> {
    let lower = text.to_lowercase();
    let month = RU_MONTH_PREFIXES
        .iter()
        .find(|(prefix, _)| lower.contains(prefix))
        .map(|(_, month)| *month)?;
    let year = lower
        .as_bytes()
        .windows(4)
        .find(|w| w[0] == b'2' && w[1] == b'0' && w[2].is_ascii_digit() && w[3].is_ascii_digit())
        .map(|w| 2000 + i32::from(w[2] - b'0') * 10 + i32::from(w[3] - b'0'))?;
    Some((year, month))
}

/// `SELECT *` over one calendar month of `created_at`.
#[must_use]
pub fn month_range_sql(table: &str, year: i32, month: u32) -> String {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    format!(
        "SELECT * FROM {} WHERE created_at >= '{year:04}-{month:02}-01' AND created_at < '{next_year:04}-{next_month:02}-01'",
        table_ref(table)
    )
}

/// Plain lowercase names are emitted bare, anything else is quoted.
fn table_ref(table: &str) -> String {
    let plain = table
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !table.starts_with(|c: char| c.is_ascii_digit());
    if plain && !table.is_empty() { table.to_owned() } else { quote_ident(table) }
}

// =============================================================================
// LLM TIER
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct LlmSqlReply {
    #[serde(default)]
    sql: Option<String>,
    #[serde(default)]
    needs_clarification: Option<bool>,
    #[serde(default)]
    clarification_question: Option<String>,
}

fn build_user_prompt(snippets: &[String], identity: &Identity, question: &str) -> String {
    fn opt<T: ToString>(value: Option<&T>) -> String {
        value.map_or_else(|| "None".to_owned(), ToString::to_string)
    }
    format!(
        "Контекст:\n{}\n\nПользователь: user_id={}, company_id={}, department_id={}, role={}\nВопрос: {question}\n\
         Ответи в JSON: {{\"sql\": \"...\", \"needs_clarification\": false, \"clarification_question\": \"\"}}",
        snippets.join("\n"),
        identity.user_id,
        opt(identity.company_id.as_ref()),
        opt(identity.department_id.as_ref()),
        opt(identity.role.as_ref()),
    )
}

/// Drop a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse the model's JSON reply.
///
/// # Errors
///
/// Returns [`LlmError::ApiParse`] when the reply is not the expected object.
pub fn parse_llm_reply(text: &str) -> Result<GeneratedSql, LlmError> {
    let reply: LlmSqlReply =
        serde_json::from_str(strip_code_fence(text)).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    Ok(GeneratedSql {
        sql: reply.sql.unwrap_or_default().trim().to_owned(),
        needs_clarification: reply.needs_clarification.unwrap_or(false),
        clarification_question: reply.clarification_question.unwrap_or_default(),
    })
}

async fn generate_with_llm(
    llm: &dyn LlmChat,
    snippets: &[String],
    identity: &Identity,
    question: &str,
) -> Result<GeneratedSql, LlmError> {
    let messages = [Message::user(build_user_prompt(snippets, identity, question))];
    let response = match llm.chat(SYSTEM_PROMPT, &messages).await {
        Err(e) if e.retryable() => {
            tracing::warn!(error = %e, "llm request failed; retrying once");
            llm.chat(SYSTEM_PROMPT, &messages).await?
        }
        other => other?,
    };
    tracing::debug!(
        model = %response.model,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "llm sql reply"
    );
    parse_llm_reply(&response.text)
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn fallback_sql(table: Option<&str>) -> String {
    table.map_or_else(|| "SELECT 1 AS ok".to_owned(), |t| format!("SELECT * FROM {}", table_ref(t)))
}

/// Produce SQL for `question` on behalf of `identity`.
pub async fn generate_sql(
    schema: &SchemaCache,
    llm: Option<&dyn LlmChat>,
    question: &str,
    identity: &Identity,
    limit: u32,
) -> GeneratedSql {
    let table = schema.first_existing_table();
    let month_year = parse_month_year(question);

    let mut generated = match (table, month_year) {
        (Some(table), Some((year, month))) if schema.table_has_column(table, "created_at") => {
            tracing::debug!(%table, year, month, "month range shortcut");
            GeneratedSql { sql: month_range_sql(table, year, month), ..GeneratedSql::default() }
        }
        _ => match llm {
            Some(llm) => {
                let snippets = retrieve_snippets(schema, question, DEFAULT_SNIPPET_COUNT);
                match generate_with_llm(llm, &snippets, identity, question).await {
                    Ok(generated) => generated,
                    Err(e) => {
                        tracing::warn!(error = %e, "llm sql generation failed");
                        GeneratedSql {
                            sql: String::new(),
                            needs_clarification: true,
                            clarification_question: GENERATION_FAILED.to_owned(),
                        }
                    }
                }
            }
            None => GeneratedSql {
                sql: fallback_sql(table),
                needs_clarification: table.is_none(),
                clarification_question: if table.is_none() { SCHEMA_UNAVAILABLE.to_owned() } else { String::new() },
            },
        },
    };

    if generated.sql.trim().is_empty() {
        generated.sql = fallback_sql(table);
        if table.is_some() {
            generated.needs_clarification = false;
            generated.clarification_question.clear();
        } else {
            generated.needs_clarification = true;
            if generated.clarification_question.is_empty() {
                generated.clarification_question = SCHEMA_UNAVAILABLE.to_owned();
            }
        }
    }

    if let Some(company_id) = identity.company_id {
        generated.sql = append_company_constraint(&generated.sql, COMPANY_COLUMN, company_id);
    }
    generated.sql = ensure_limit(&generated.sql, limit);
    generated
}

#[cfg(test)]
#[path = "sql_generator_test.rs"]
mod tests;
