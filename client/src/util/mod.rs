//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns and string rendering
//! from page and component logic to improve reuse and testability.

pub mod html;
pub mod labels;
pub mod response_html;
pub mod storage;
