use super::test_helpers::{test_app_state, test_app_state_with_schema};
use crate::services::schema::test_helpers::sample_cache;

#[tokio::test]
async fn new_state_starts_with_empty_schema_and_no_llm() {
    let state = test_app_state();
    assert!(state.schema.read().await.is_empty());
    assert!(state.llm.is_none());
    assert_eq!(state.config.default_limit, 200);
}

#[tokio::test]
async fn schema_returns_cached_snapshot_without_database() {
    let state = test_app_state_with_schema(sample_cache()).await;
    let schema = state.schema().await.unwrap();
    assert_eq!(schema.first_existing_table(), Some("tasks"));
}

#[tokio::test]
async fn clones_share_the_schema_cache() {
    let state = test_app_state();
    let clone = state.clone();
    *state.schema.write().await = std::sync::Arc::new(sample_cache());
    assert!(!clone.schema.read().await.is_empty());
}
