use serde_json::json;

use super::*;
use crate::services::schema::SchemaCache;
use crate::state::test_helpers::test_app_state_with_schema;

#[test]
fn merge_identity_fills_missing_fields() {
    let mut identity = Identity { user_id: 1, ..Identity::default() };
    merge_identity(&mut identity, &json!({"id": 1, "company_id": 7, "department_id": 3}));
    assert_eq!(identity.company_id, Some(7));
    assert_eq!(identity.department_id, Some(3));
}

#[test]
fn merge_identity_keeps_caller_values() {
    let mut identity = Identity { user_id: 1, company_id: Some(2), ..Identity::default() };
    merge_identity(&mut identity, &json!({"id": 1, "company_id": 7, "department_id": null}));
    assert_eq!(identity.company_id, Some(2));
    assert_eq!(identity.department_id, None);
}

#[test]
fn into_objects_keeps_column_order() {
    let rows: Vec<Value> = vec![serde_json::from_str(r#"{"title": "a", "id": 1}"#).unwrap()];
    let objects = into_objects(rows);
    let keys: Vec<&str> = objects[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["title", "id"]);
}

#[test]
fn error_messages_match_wire_detail() {
    assert_eq!(AskError::UnknownUser.to_string(), "Unknown user_id");
    assert_eq!(AskError::InvalidRequest("bad".into()).to_string(), "Invalid request: bad");
    let unsafe_sql = AskError::UnsafeSql { sql: "DROP TABLE x".into() };
    assert_eq!(unsafe_sql.to_string(), "Unsafe or empty SQL");
    assert_eq!(unsafe_sql.sql(), Some("DROP TABLE x"));
    assert!(AskError::EmptySchema.hint().is_some());
    assert!(AskError::UnknownUser.sql().is_none());
}

#[tokio::test]
async fn answer_rejects_out_of_range_limit_before_database() {
    let state = test_app_state_with_schema(SchemaCache::default()).await;
    let request: AskRequest =
        serde_json::from_value(json!({"question": "q", "identity": {"user_id": 1}, "limit": 0})).unwrap();
    let err = answer(&state, request).await.unwrap_err();
    assert!(matches!(err, AskError::InvalidRequest(_)));
}
