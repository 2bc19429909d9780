//! Database pool initialization and JSON row helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup uses this module to create the shared SQLx pool. Every pooled
//! connection is pinned to UTF-8 and, when configured, to a read-only role so
//! generated SQL runs with the narrowest privileges available.
//!
//! Generated queries have arbitrary column sets, so rows are fetched as JSON
//! objects (`row_to_json`) rather than decoded into fixed structs.

use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;

use crate::config::AppConfig;
use crate::services::safety::statement_body;

fn pool_options(config: &AppConfig) -> PgPoolOptions {
    let role = config.readonly_role.clone();
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .after_connect(move |conn, _meta| {
            let role = role.clone();
            Box::pin(async move {
                conn.execute("SET client_encoding TO 'UTF8'").await?;
                if let Some(role) = role {
                    let stmt = format!("SET ROLE {}", quote_ident(&role));
                    conn.execute(stmt.as_str()).await?;
                }
                Ok(())
            })
        })
}

/// Initialize the `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns an error if the first connection cannot be established.
pub async fn init_pool(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config).connect(&config.database_url).await
}

/// Quote a Postgres identifier, doubling embedded quotes.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Wrap an arbitrary `SELECT` so each row comes back as one JSON object with
/// columns in select-list order. Trailing semicolons and comments are cut so
/// they cannot swallow the closing parenthesis.
pub(crate) fn wrap_rows_as_json(sql: &str) -> String {
    let core = statement_body(sql);
    format!("SELECT row_to_json(q) FROM ({core}) AS q")
}

/// Execute generated SQL and return its rows as JSON objects.
///
/// # Errors
///
/// Returns the database error verbatim (syntax errors, missing relations,
/// permission failures).
pub async fn fetch_json_rows(pool: &PgPool, sql: &str) -> Result<Vec<Value>, sqlx::Error> {
    let wrapped = wrap_rows_as_json(sql);
    sqlx::query_scalar::<_, Value>(&wrapped).fetch_all(pool).await
}

/// Fetch one `public.users` row as a JSON object.
///
/// # Errors
///
/// Returns an error if the query fails (including a missing `users` table).
pub async fn fetch_user(pool: &PgPool, user_id: i64) -> Result<Option<Value>, sqlx::Error> {
    sqlx::query_scalar::<_, Value>("SELECT row_to_json(u) FROM public.users AS u WHERE u.id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Count tasks owned by `user_id` in `public.tasks`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn count_user_tasks(pool: &PgPool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM public.tasks WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

#[cfg(test)]
pub(crate) fn lazy_pool(config: &AppConfig) -> PgPool {
    pool_options(config)
        .connect_lazy(&config.database_url)
        .expect("connect_lazy should not fail")
}
