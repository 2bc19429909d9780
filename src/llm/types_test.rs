use super::*;

#[test]
fn retryable_covers_transport_and_server_errors() {
    assert!(LlmError::ApiRequest("timeout".into()).retryable());
    assert!(LlmError::ApiResponse { status: 429, body: String::new() }.retryable());
    assert!(LlmError::ApiResponse { status: 503, body: String::new() }.retryable());
}

#[test]
fn retryable_excludes_client_and_config_errors() {
    assert!(!LlmError::ApiResponse { status: 401, body: String::new() }.retryable());
    assert!(!LlmError::ApiParse("bad json".into()).retryable());
    assert!(!LlmError::MissingApiKey { var: "OPENAI_API_KEY".into() }.retryable());
}

#[test]
fn missing_api_key_message_names_variable() {
    let err = LlmError::MissingApiKey { var: "OPENAI_API_KEY".into() };
    assert_eq!(err.to_string(), "missing API key: env var OPENAI_API_KEY not set");
}

#[test]
fn user_message_sets_role() {
    let msg = Message::user("hello");
    assert_eq!(msg.role, "user");
    assert_eq!(msg.content, "hello");
}
