use std::sync::Mutex;

use super::*;
use crate::llm::types::ChatResponse;
use crate::services::schema::test_helpers::sample_cache;

// =============================================================================
// MOCK LLM
// =============================================================================

struct MockLlm {
    reply: Result<String, String>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl MockLlm {
    fn replying(text: &str) -> Self {
        Self { reply: Ok(text.to_owned()), prompts: Mutex::new(Vec::new()) }
    }

    fn failing() -> Self {
        Self { reply: Err("connection refused".to_owned()), prompts: Mutex::new(Vec::new()) }
    }

    fn rejecting() -> Self {
        Self { reply: Err("unauthorized".to_owned()), prompts: Mutex::new(Vec::new()) }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl LlmChat for MockLlm {
    async fn chat(&self, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        let user = messages.first().map(|m| m.content.clone()).unwrap_or_default();
        self.prompts.lock().unwrap().push((system.to_owned(), user));
        match &self.reply {
            Ok(text) => Ok(ChatResponse { text: text.clone(), model: "mock".into(), input_tokens: 0, output_tokens: 0 }),
            Err(e) if e == "unauthorized" => Err(LlmError::ApiResponse { status: 401, body: e.clone() }),
            Err(e) => Err(LlmError::ApiRequest(e.clone())),
        }
    }
}

fn identity(company_id: Option<i64>) -> Identity {
    Identity { user_id: 1, company_id, ..Identity::default() }
}

// =============================================================================
// MONTH PARSING
// =============================================================================

#[test]
fn parse_month_year_finds_month_and_year() {
    assert_eq!(parse_month_year("Все задачи моей компании за Сентябрь 2025"), Some((2025, 9)));
    assert_eq!(parse_month_year("задачи в мае 2024"), Some((2024, 5)));
    assert_eq!(parse_month_year("декабря 2030 года"), Some((2030, 12)));
}

#[test]
fn parse_month_year_needs_both_parts() {
    assert_eq!(parse_month_year("задачи за сентябрь"), None);
    assert_eq!(parse_month_year("tasks in 2025"), None);
}

#[test]
fn month_range_rolls_over_year() {
    assert_eq!(
        month_range_sql("tasks", 2025, 12),
        "SELECT * FROM tasks WHERE created_at >= '2025-12-01' AND created_at < '2026-01-01'"
    );
}

#[test]
fn table_ref_quotes_unusual_names() {
    assert_eq!(table_ref("tasks"), "tasks");
    assert_eq!(table_ref("Tasks"), "\"Tasks\"");
    assert_eq!(table_ref("1st"), "\"1st\"");
}

// =============================================================================
// REPLY PARSING
// =============================================================================

#[test]
fn parse_llm_reply_reads_fields() {
    let generated =
        parse_llm_reply(r#"{"sql": " SELECT id FROM tasks ", "needs_clarification": true, "clarification_question": "Какой период?"}"#)
            .unwrap();
    assert_eq!(generated.sql, "SELECT id FROM tasks");
    assert!(generated.needs_clarification);
    assert_eq!(generated.clarification_question, "Какой период?");
}

#[test]
fn parse_llm_reply_tolerates_code_fence_and_missing_fields() {
    let generated = parse_llm_reply("```json\n{\"sql\": \"SELECT 1\"}\n```").unwrap();
    assert_eq!(generated.sql, "SELECT 1");
    assert!(!generated.needs_clarification);
    assert!(generated.clarification_question.is_empty());
}

#[test]
fn parse_llm_reply_rejects_prose() {
    assert!(matches!(parse_llm_reply("Sure! Here is your SQL"), Err(LlmError::ApiParse(_))));
}

// =============================================================================
// GENERATE
// =============================================================================

#[tokio::test]
async fn month_question_uses_shortcut_without_llm() {
    let llm = MockLlm::replying(r#"{"sql": "SELECT 2"}"#);
    let generated =
        generate_sql(&sample_cache(), Some(&llm), "Все задачи за сентябрь 2025", &identity(None), 200).await;
    assert_eq!(
        generated.sql,
        "SELECT * FROM tasks WHERE created_at >= '2025-09-01' AND created_at < '2025-10-01' LIMIT 200"
    );
    assert!(!generated.needs_clarification);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn company_constraint_wraps_month_range() {
    let generated = generate_sql(&sample_cache(), None, "октябрь 2025", &identity(Some(3)), 50).await;
    assert_eq!(
        generated.sql,
        "SELECT * FROM tasks WHERE (created_at >= '2025-10-01' AND created_at < '2025-11-01') AND company_id = 3 LIMIT 50"
    );
}

#[tokio::test]
async fn llm_sql_gets_limit_and_prompt_carries_context() {
    let llm = MockLlm::replying(r#"{"sql": "SELECT id, title FROM tasks WHERE user_id = 1", "needs_clarification": false, "clarification_question": ""}"#);
    let who = Identity { user_id: 1, company_id: None, department_id: Some(4), role: Some("manager".into()) };
    let generated = generate_sql(&sample_cache(), Some(&llm), "мои задачи", &who, 200).await;

    assert_eq!(generated.sql, "SELECT id, title FROM tasks WHERE user_id = 1 LIMIT 200");
    let prompts = llm.prompts.lock().unwrap();
    let (system, user) = &prompts[0];
    assert_eq!(system, SYSTEM_PROMPT);
    assert!(user.contains("table tasks("));
    assert!(user.contains("user_id=1, company_id=None, department_id=4, role=manager"));
    assert!(user.contains("Вопрос: мои задачи"));
}

#[tokio::test]
async fn llm_failure_falls_back_to_table_scan() {
    let llm = MockLlm::failing();
    let generated = generate_sql(&sample_cache(), Some(&llm), "что-нибудь", &identity(None), 200).await;
    assert_eq!(generated.sql, "SELECT * FROM tasks LIMIT 200");
    assert!(!generated.needs_clarification);
    // Transport errors are retried once before falling back.
    assert_eq!(llm.calls(), 2);
}

#[tokio::test]
async fn llm_failure_on_empty_schema_keeps_failure_message() {
    let llm = MockLlm::failing();
    let generated = generate_sql(&SchemaCache::default(), Some(&llm), "что-нибудь", &identity(None), 200).await;
    assert_eq!(generated.sql, "SELECT 1 AS ok LIMIT 200");
    assert!(generated.needs_clarification);
    assert_eq!(generated.clarification_question, GENERATION_FAILED);
}

#[tokio::test]
async fn no_llm_and_empty_schema_reports_unavailable() {
    let generated = generate_sql(&SchemaCache::default(), None, "что-нибудь", &identity(Some(9)), 200).await;
    assert_eq!(generated.sql, "SELECT 1 AS ok LIMIT 200");
    assert!(generated.needs_clarification);
    assert_eq!(generated.clarification_question, SCHEMA_UNAVAILABLE);
}

#[tokio::test]
async fn no_llm_scans_preferred_table() {
    let generated = generate_sql(&sample_cache(), None, "show my tasks", &identity(Some(2)), 10).await;
    assert_eq!(generated.sql, "SELECT * FROM tasks WHERE company_id = 2 LIMIT 10");
    assert!(!generated.needs_clarification);
}

#[tokio::test]
async fn non_retryable_llm_error_is_not_retried() {
    let llm = MockLlm::rejecting();
    let generated = generate_sql(&sample_cache(), Some(&llm), "что-нибудь", &identity(None), 200).await;
    assert_eq!(generated.sql, "SELECT * FROM tasks LIMIT 200");
    assert_eq!(llm.calls(), 1);
}
