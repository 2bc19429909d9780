//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the question-to-SQL pipeline and its database access
//! so route handlers can stay focused on body parsing and status codes.

pub mod ask;
pub mod retriever;
pub mod safety;
pub mod schema;
pub mod sql_generator;
