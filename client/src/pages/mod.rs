//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! The console is the only screen. It owns the signals, adapts them to the
//! controller's view trait and delegates modal rendering to `components`.

pub mod console;
