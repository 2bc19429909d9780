//! Client state that outlives a single event handler.
//!
//! SYSTEM CONTEXT
//! ==============
//! `identity` owns the saved user identifier; `diagnostic` owns the health
//! popup.

pub mod diagnostic;
pub mod identity;
