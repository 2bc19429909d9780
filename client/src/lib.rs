//! # ragsql-client
//!
//! Leptos + WASM query console for the `ragsql` server. Users save an
//! identifier once, ask questions in natural language and read the generated
//! SQL and matching rows.
//!
//! The console logic (`console`, `state`, `util`) is browser-independent and
//! tested natively; the `csr` feature switches on `localStorage`, HTTP and
//! timers.

pub mod app;
pub mod components;
pub mod console;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Install logging and the panic hook, then mount the app on `<body>`.
#[cfg(feature = "csr")]
pub fn mount() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("ragsql console starting");
    leptos::mount::mount_to_body(app::App);
}
