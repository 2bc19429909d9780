use serde_json::json;

use super::*;

#[test]
fn known_fields_are_translated() {
    assert_eq!(field_label("created_at"), "Дата создания");
    assert_eq!(field_label("assigned_to"), "Исполнитель");
    assert_eq!(field_label("user_id"), "User ID");
}

#[test]
fn unknown_keys_pass_through() {
    assert_eq!(field_label("due_at"), "due_at");
    assert_eq!(status_label("archived"), "archived");
    assert_eq!(priority_label("urgent"), "urgent");
}

#[test]
fn statuses_and_priorities_are_translated() {
    assert_eq!(status_label("in_progress"), "В процессе");
    assert_eq!(status_label("completed"), "Завершена");
    assert_eq!(priority_label("high"), "Высокий");
}

#[test]
fn saved_banner_mentions_identifier() {
    assert_eq!(
        identifier_saved("42"),
        "User ID 42 успешно сохранен! Теперь вы можете запрашивать свои задачи."
    );
}

#[test]
fn formats_naive_timestamps() {
    assert_eq!(format_date(&json!("2025-09-15T10:30:00")), "15.09.2025, 10:30:00");
    assert_eq!(format_date(&json!("2025-09-15T10:30:00.123456")), "15.09.2025, 10:30:00");
    assert_eq!(format_date(&json!("2025-09-15 08:05:09")), "15.09.2025, 08:05:09");
}

#[test]
fn keeps_offset_wall_clock() {
    assert_eq!(format_date(&json!("2025-09-15T10:30:00+03:00")), "15.09.2025, 10:30:00");
}

#[test]
fn formats_date_only_and_epoch_millis() {
    assert_eq!(format_date(&json!("2025-01-02")), "02.01.2025, 00:00:00");
    assert_eq!(format_date(&json!(0)), "01.01.1970, 00:00:00");
}

#[test]
fn unparseable_date_is_returned_raw() {
    assert_eq!(format_date(&json!("вчера")), "вчера");
    assert_eq!(format_date(&json!(true)), "true");
}
