//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the console's modals from signals owned by the page and
//! report user actions back through callbacks.

pub mod diagnostic_modal;
pub mod gate_modal;
