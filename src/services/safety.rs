//! SQL safety gate and query rewriting for generated SQL.
//!
//! DESIGN
//! ======
//! Generated SQL is untrusted. A small lexical scanner (strings, quoted
//! identifiers, comments and parenthesis depth) is enough to decide whether a
//! statement is a single read-only query and to splice clauses in at the top
//! level without touching subqueries or literals.
//!
//! TRADE-OFFS
//! ==========
//! The gate is conservative: a data-modifying keyword anywhere outside a
//! literal rejects the statement, even if it would have been harmless in
//! context. Utility commands such as `LOCK` or `COMMENT` are only rejected in
//! statement position, so columns with those names stay queryable.
//! The rewrites are best-effort and return the input unchanged whenever the
//! statement shape is not a plain top-level `SELECT ... FROM`.

/// Keywords that modify data, schema or privileges. Rejected anywhere
/// outside a literal.
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "insert", "update", "delete", "merge", "upsert", "drop", "alter", "create", "truncate", "grant", "revoke",
    "into",
];

/// Utility commands that are also common column names. Rejected only where a
/// statement can start: directly after `(`.
const FORBIDDEN_STATEMENTS: &[&str] = &[
    "copy", "call", "execute", "vacuum", "analyze", "lock", "refresh", "reindex", "cluster", "set", "reset",
    "listen", "notify", "comment", "do",
];

/// Top-level keywords that end a `WHERE` clause.
const CLAUSE_TERMINATORS: &[&str] = &["group", "having", "window", "order", "limit", "offset", "fetch", "for"];

const SET_OPERATORS: &[&str] = &["union", "intersect", "except"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Word,
    /// String literal or quoted identifier.
    Quoted,
    Symbol,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: TokenKind,
    text: &'a str,
    start: usize,
    end: usize,
    /// Parenthesis nesting level the token sits at.
    depth: usize,
}

impl Token<'_> {
    fn is_kw(&self, kw: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(kw)
    }

    fn is_any_kw(&self, kws: &[&str]) -> bool {
        kws.iter().any(|kw| self.is_kw(kw))
    }

    fn is_symbol(&self, c: u8) -> bool {
        self.kind == TokenKind::Symbol && self.text.as_bytes() == [c]
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || !b.is_ascii()
}

/// Split `sql` into tokens. Returns `None` for unterminated literals or
/// comments and for unbalanced parentheses.
fn scan(sql: &str) -> Option<Vec<Token<'_>>> {
    let bytes = sql.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < len {
        let b = bytes[i];
        let start = i;
        match b {
            b if b.is_ascii_whitespace() => {
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < len && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let close = sql[i + 2..].find("*/")?;
                i += 2 + close + 2;
            }
            b'\'' | b'"' => {
                i += 1;
                loop {
                    if i >= len {
                        return None;
                    }
                    if bytes[i] == b {
                        if bytes.get(i + 1) == Some(&b) {
                            i += 2;
                            continue;
                        }
                        i += 1;
                        break;
                    }
                    i += 1;
                }
                tokens.push(Token { kind: TokenKind::Quoted, text: &sql[start..i], start, end: i, depth });
            }
            b if is_word_byte(b) => {
                while i < len && is_word_byte(bytes[i]) {
                    i += 1;
                }
                tokens.push(Token { kind: TokenKind::Word, text: &sql[start..i], start, end: i, depth });
            }
            b'(' => {
                i += 1;
                tokens.push(Token { kind: TokenKind::Symbol, text: &sql[start..i], start, end: i, depth });
                depth += 1;
            }
            b')' => {
                depth = depth.checked_sub(1)?;
                i += 1;
                tokens.push(Token { kind: TokenKind::Symbol, text: &sql[start..i], start, end: i, depth });
            }
            _ => {
                i += 1;
                tokens.push(Token { kind: TokenKind::Symbol, text: &sql[start..i], start, end: i, depth });
            }
        }
    }

    (depth == 0).then_some(tokens)
}

/// Whether `sql` is a single read-only query (`SELECT`, `WITH ... SELECT`, or
/// a set operation over selects).
#[must_use]
pub fn is_safe_select(sql: &str) -> bool {
    let Some(tokens) = scan(sql) else {
        return false;
    };
    let Some(first) = tokens.iter().find(|t| !t.is_symbol(b'(')) else {
        return false;
    };
    if !(first.is_kw("select") || first.is_kw("with")) {
        return false;
    }
    // Semicolons are only allowed as trailing terminators.
    if let Some(pos) = tokens.iter().position(|t| t.is_symbol(b';')) {
        if tokens[pos..].iter().any(|t| !t.is_symbol(b';')) {
            return false;
        }
    }
    if tokens.iter().any(|t| t.is_any_kw(FORBIDDEN_KEYWORDS)) {
        return false;
    }
    !tokens
        .windows(2)
        .any(|pair| pair[0].is_symbol(b'(') && pair[1].is_any_kw(FORBIDDEN_STATEMENTS))
}

/// Append `LIMIT n` unless the statement already mentions `limit`. The clause
/// goes right after the last token, ahead of any trailing semicolon or
/// comment.
#[must_use]
pub fn ensure_limit(sql: &str, default_limit: u32) -> String {
    let tokens = scan(sql).unwrap_or_default();
    if tokens.iter().any(|t| t.is_kw("limit")) {
        return sql.to_owned();
    }
    let Some(last) = tokens.iter().rev().find(|t| !t.is_symbol(b';')) else {
        let stripped = sql.trim_end();
        return match stripped.strip_suffix(';') {
            Some(core) => format!("{} LIMIT {default_limit};", core.trim_end()),
            None => format!("{stripped} LIMIT {default_limit}"),
        };
    };
    let mut out = format!("{} LIMIT {default_limit}", &sql[..last.end]);
    let tail = sql[last.end..].trim();
    if !tail.is_empty() {
        if !tail.starts_with(';') {
            out.push(' ');
        }
        out.push_str(tail);
    }
    out
}

/// The statement without trailing semicolons, comments or whitespace, ready
/// to be embedded in an outer query.
pub(crate) fn statement_body(sql: &str) -> &str {
    match scan(sql).as_deref().and_then(|tokens| tokens.iter().rev().find(|t| !t.is_symbol(b';'))) {
        Some(last) => &sql[..last.end],
        None => sql.trim_end().trim_end_matches(';').trim_end(),
    }
}

/// Add `column = company_id` to the top-level `WHERE` of a plain
/// `SELECT ... FROM` statement, or of the main query after a `WITH` list.
/// Any other shape is returned unchanged.
#[must_use]
pub fn append_company_constraint(sql: &str, column: &str, company_id: i64) -> String {
    let Some(tokens) = scan(sql) else {
        return sql.to_owned();
    };
    let top: Vec<&Token<'_>> = tokens.iter().filter(|t| t.depth == 0).collect();

    let main_select = match top.first() {
        Some(t) if t.is_kw("select") => 0,
        // CTE bodies sit inside parentheses, so the first top-level SELECT is
        // the main query.
        Some(t) if t.is_kw("with") => match top.iter().position(|t| t.is_kw("select")) {
            Some(idx) => idx,
            None => return sql.to_owned(),
        },
        _ => return sql.to_owned(),
    };
    let top = &top[main_select..];
    if top.iter().any(|t| t.is_any_kw(SET_OPERATORS)) {
        return sql.to_owned();
    }
    let Some(from_idx) = top.iter().position(|t| t.is_kw("from")) else {
        return sql.to_owned();
    };
    let where_idx = top[from_idx..]
        .iter()
        .position(|t| t.is_kw("where"))
        .map(|i| i + from_idx);

    let search_from = where_idx.unwrap_or(from_idx) + 1;
    // Without a trailing clause the splice goes after the last token, ahead
    // of any trailing comment.
    let clause_end = match top[search_from..]
        .iter()
        .find(|t| t.is_any_kw(CLAUSE_TERMINATORS) || t.is_symbol(b';'))
    {
        Some(t) => t.start,
        None => top.last().map_or(sql.len(), |t| t.end),
    };

    let constraint = format!("{column} = {company_id}");
    let tail = sql[clause_end..].trim_start();

    let mut out = match where_idx {
        Some(idx) => {
            let where_tok = top[idx];
            let before = sql[..where_tok.start].trim_end();
            let cond = sql[where_tok.end..clause_end].trim();
            format!("{before} WHERE ({cond}) AND {constraint}")
        }
        None => {
            let head = sql[..clause_end].trim_end();
            format!("{head} WHERE {constraint}")
        }
    };
    if !tail.is_empty() {
        if !tail.starts_with(';') {
            out.push(' ');
        }
        out.push_str(tail);
    }
    out
}

#[cfg(test)]
#[path = "safety_test.rs"]
mod tests;
