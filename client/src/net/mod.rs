//! Networking modules for the console's HTTP calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs and interprets `/ask` and `/health` calls, and `types`
//! defines the shared wire schema.

pub mod api;
pub mod types;
