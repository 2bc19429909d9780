//! Schema cache for the tables, columns and foreign keys of `public`.
//!
//! DESIGN
//! ======
//! Loaded lazily from `information_schema` the first time `/ask` or
//! `/debug/schema` needs it, then kept in memory for the process lifetime.
//! The cache feeds both the rule-based SQL shortcut (table/column lookups) and
//! the retriever (text snippets for the LLM prompt).

use std::collections::BTreeMap;

use sqlx::{PgPool, Row};

/// Tables preferred by the rule-based generator, in priority order.
const PREFERRED_TABLES: &[&str] = &["tasks", "task", "users", "user"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub child_table: String,
    pub child_column: String,
    pub parent_table: String,
    pub parent_column: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Default)]
pub struct SchemaCache {
    /// Tables keyed by name; `BTreeMap` keeps snippet output sorted.
    pub tables: BTreeMap<String, TableSchema>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl SchemaCache {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Build a cache from already-fetched column rows, grouping by table while
    /// preserving column order.
    #[must_use]
    pub fn from_parts(columns: Vec<(String, Column)>, foreign_keys: Vec<ForeignKey>) -> Self {
        let mut tables: BTreeMap<String, TableSchema> = BTreeMap::new();
        for (table, column) in columns {
            tables
                .entry(table.clone())
                .or_insert_with(|| TableSchema { table, columns: Vec::new() })
                .columns
                .push(column);
        }
        Self { tables, foreign_keys }
    }

    /// Load the `public` schema from `information_schema`.
    ///
    /// # Errors
    ///
    /// Returns an error if either catalog query fails.
    pub async fn load(pool: &PgPool) -> Result<Self, SchemaError> {
        let column_rows = sqlx::query(
            r"SELECT table_name::text AS table_name,
                     column_name::text AS column_name,
                     data_type::text AS data_type,
                     is_nullable::text AS is_nullable
              FROM information_schema.columns
              WHERE table_schema = 'public'
              ORDER BY table_name, ordinal_position",
        )
        .fetch_all(pool)
        .await?;

        let columns = column_rows
            .iter()
            .map(|r| {
                let nullable: String = r.get("is_nullable");
                (
                    r.get::<String, _>("table_name"),
                    Column { name: r.get("column_name"), data_type: r.get("data_type"), is_nullable: nullable == "YES" },
                )
            })
            .collect();

        let fk_rows = sqlx::query(
            r"SELECT tc.table_name::text AS child_table,
                     kcu.column_name::text AS child_column,
                     ccu.table_name::text AS parent_table,
                     ccu.column_name::text AS parent_column
              FROM information_schema.table_constraints tc
              JOIN information_schema.key_column_usage kcu USING (constraint_name, table_schema)
              JOIN information_schema.constraint_column_usage ccu USING (constraint_name, table_schema)
              WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_schema = 'public'
              ORDER BY child_table",
        )
        .fetch_all(pool)
        .await?;

        let foreign_keys = fk_rows
            .iter()
            .map(|r| ForeignKey {
                child_table: r.get("child_table"),
                child_column: r.get("child_column"),
                parent_table: r.get("parent_table"),
                parent_column: r.get("parent_column"),
            })
            .collect();

        Ok(Self::from_parts(columns, foreign_keys))
    }

    /// Pick the table the rule-based generator queries: a preferred name if it
    /// exists, otherwise the alphabetically first table.
    #[must_use]
    pub fn first_existing_table(&self) -> Option<&str> {
        PREFERRED_TABLES
            .iter()
            .find(|name| self.tables.contains_key(**name))
            .copied()
            .or_else(|| self.tables.keys().next().map(String::as_str))
    }

    /// Case-insensitive column lookup.
    #[must_use]
    pub fn table_has_column(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|t| t.columns.iter().any(|c| c.name.eq_ignore_ascii_case(column)))
    }

    /// Render one snippet per table (`table t(col:type, ...)`) followed by one
    /// per foreign key (`fk a.b -> c.d`). Non-nullable columns are marked
    /// `not null`.
    #[must_use]
    pub fn to_text_snippets(&self) -> Vec<String> {
        let mut snippets: Vec<String> = self
            .tables
            .values()
            .map(|schema| {
                let cols = schema
                    .columns
                    .iter()
                    .map(|c| {
                        if c.is_nullable {
                            format!("{}:{}", c.name, c.data_type)
                        } else {
                            format!("{}:{} not null", c.name, c.data_type)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("table {}({cols})", schema.table)
            })
            .collect();
        snippets.extend(self.foreign_keys.iter().map(|fk| {
            format!("fk {}.{} -> {}.{}", fk.child_table, fk.child_column, fk.parent_table, fk.parent_column)
        }));
        snippets
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    pub(crate) fn col(name: &str, data_type: &str) -> Column {
        Column { name: name.to_owned(), data_type: data_type.to_owned(), is_nullable: true }
    }

    pub(crate) fn sample_cache() -> SchemaCache {
        SchemaCache::from_parts(
            vec![
                ("users".to_owned(), col("id", "integer")),
                ("users".to_owned(), col("company_id", "integer")),
                ("tasks".to_owned(), col("id", "integer")),
                ("tasks".to_owned(), col("title", "text")),
                ("tasks".to_owned(), col("Created_At", "timestamp without time zone")),
            ],
            vec![ForeignKey {
                child_table: "tasks".to_owned(),
                child_column: "user_id".to_owned(),
                parent_table: "users".to_owned(),
                parent_column: "id".to_owned(),
            }],
        )
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
