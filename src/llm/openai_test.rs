use super::*;

#[test]
fn cc_parse_text_response() {
    let json = serde_json::json!({
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "{\"sql\": \"SELECT 1\"}" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.text, "{\"sql\": \"SELECT 1\"}");
    assert_eq!(resp.model, "gpt-4o-mini");
    assert_eq!(resp.input_tokens, 10);
    assert_eq!(resp.output_tokens, 5);
}

#[test]
fn cc_parse_null_content_is_empty_text() {
    let json = serde_json::json!({
        "model": "gpt-4o-mini",
        "choices": [{ "message": { "role": "assistant", "content": null } }]
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert!(resp.text.is_empty());
    assert_eq!(resp.input_tokens, 0);
}

#[test]
fn cc_parse_missing_choices() {
    let json = serde_json::json!({ "model": "gpt-4o-mini", "choices": [] }).to_string();
    assert!(matches!(parse_chat_completions_response(&json), Err(LlmError::ApiParse(_))));
}

#[test]
fn cc_parse_invalid_json() {
    assert!(matches!(parse_chat_completions_response("not json"), Err(LlmError::ApiParse(_))));
}

#[test]
fn cc_messages_prepend_system_prompt() {
    let messages = vec![Message::user("вопрос")];
    let out = build_chat_completions_messages("rules", &messages);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].role, "system");
    assert_eq!(out[0].content, "rules");
    assert_eq!(out[1].role, "user");
    assert_eq!(out[1].content, "вопрос");
}

#[test]
fn cc_messages_skip_blank_system_prompt() {
    let messages = vec![Message::user("q")];
    let out = build_chat_completions_messages("  ", &messages);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].role, "user");
}
