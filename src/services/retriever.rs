//! Context retrieval for SQL generation prompts.
//!
//! Scores schema snippets and business rules by token overlap with the
//! question and returns the best `k`. Ties keep corpus order (schema first,
//! then rules) because the sort is stable.

use std::collections::HashSet;

use super::schema::SchemaCache;

pub const DEFAULT_SNIPPET_COUNT: usize = 12;

pub const BUSINESS_RULES: &[&str] = &[
    "active statuses: new, in_progress",
    "completed status: done, closed",
    "employees see own tasks; managers see subordinates",
];

/// Lowercased word tokens: runs of alphanumerics, `_` and `-`.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Number of query tokens (with repeats) that appear in `text`.
#[must_use]
pub fn score(query_tokens: &[String], text: &str) -> usize {
    let token_set: HashSet<String> = tokenize(text).into_iter().collect();
    query_tokens
        .iter()
        .filter(|t| token_set.contains(*t))
        .count()
}

#[must_use]
pub fn retrieve_snippets(schema: &SchemaCache, question: &str, k: usize) -> Vec<String> {
    let query_tokens = tokenize(question);
    let mut corpus: Vec<(usize, String)> = schema
        .to_text_snippets()
        .into_iter()
        .chain(BUSINESS_RULES.iter().map(|r| (*r).to_owned()))
        .map(|text| (score(&query_tokens, &text), text))
        .collect();
    corpus.sort_by(|a, b| b.0.cmp(&a.0));
    corpus.into_iter().take(k).map(|(_, text)| text).collect()
}

#[cfg(test)]
#[path = "retriever_test.rs"]
mod tests;
