use super::*;
use crate::services::schema::test_helpers::sample_cache;

#[test]
fn tokenize_lowercases_and_keeps_word_chars() {
    assert_eq!(tokenize("Show in_progress TASKS, please!"), vec!["show", "in_progress", "tasks", "please"]);
}

#[test]
fn tokenize_handles_cyrillic_and_hyphens() {
    assert_eq!(tokenize("Все задачи за сентябрь-2025"), vec!["все", "задачи", "за", "сентябрь-2025"]);
}

#[test]
fn score_counts_overlapping_tokens() {
    let q = tokenize("tasks tasks users");
    assert_eq!(score(&q, "table tasks(id:integer)"), 2);
    assert_eq!(score(&q, "nothing relevant"), 0);
}

#[test]
fn retrieve_ranks_matching_snippets_first() {
    let snippets = retrieve_snippets(&sample_cache(), "completed status", 2);
    assert_eq!(snippets.len(), 2);
    assert_eq!(snippets[0], "completed status: done, closed");
    // "statuses" is a different token, so the other rule ties at zero.
    assert!(snippets[1].starts_with("table tasks"));
}

#[test]
fn retrieve_keeps_corpus_order_on_ties() {
    let snippets = retrieve_snippets(&sample_cache(), "zzz", DEFAULT_SNIPPET_COUNT);
    assert_eq!(snippets.len(), 6);
    assert!(snippets[0].starts_with("table tasks"));
    assert_eq!(snippets[5], BUSINESS_RULES[2]);
}

#[test]
fn retrieve_truncates_to_k() {
    assert_eq!(retrieve_snippets(&sample_cache(), "tasks", 1).len(), 1);
}
