use super::*;

#[test]
fn memory_store_round_trips_and_overwrites() {
    let store = MemoryStore::default();
    assert_eq!(store.get("k"), None);
    store.set("k", "1").unwrap();
    store.set("k", "2").unwrap();
    assert_eq!(store.get("k").as_deref(), Some("2"));
}

#[test]
fn memory_store_can_be_seeded() {
    let store = MemoryStore::with_entry("rag_sql_user_id", "7");
    assert_eq!(store.get("rag_sql_user_id").as_deref(), Some("7"));
}

#[cfg(not(feature = "csr"))]
#[test]
fn browser_storage_is_inert_outside_browser() {
    let store = BrowserStorage;
    assert_eq!(store.get("k"), None);
    assert_eq!(store.set("k", "v"), Err(StorageError::Unavailable));
}
