use super::*;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// # Safety
/// Callers must hold [`env_lock`] so tests in this module do not race.
unsafe fn clear_server_env() {
    unsafe {
        std::env::remove_var("POSTGRES_DSN");
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("PORT");
        std::env::remove_var("DB_MAX_CONNECTIONS");
        std::env::remove_var("READONLY_ROLE");
        std::env::remove_var("STATIC_DIR");
        std::env::remove_var("ASK_DEFAULT_LIMIT");
    }
}

#[test]
fn from_env_uses_defaults() {
    let _env = env_lock();
    unsafe { clear_server_env() };

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.database_url, DEFAULT_POSTGRES_DSN);
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(cfg.readonly_role, None);
    assert_eq!(cfg.default_limit, DEFAULT_ASK_LIMIT);
    assert!(cfg.static_dir.ends_with("client/dist"));
}

#[test]
fn from_env_prefers_postgres_dsn_over_database_url() {
    let _env = env_lock();
    unsafe {
        clear_server_env();
        std::env::set_var("POSTGRES_DSN", "postgresql://a/one");
        std::env::set_var("DATABASE_URL", "postgresql://b/two");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.database_url, "postgresql://a/one");

    unsafe { clear_server_env() };
}

#[test]
fn from_env_falls_back_to_database_url() {
    let _env = env_lock();
    unsafe {
        clear_server_env();
        std::env::set_var("DATABASE_URL", "postgresql://b/two");
        std::env::set_var("READONLY_ROLE", "  reporter ");
        std::env::set_var("PORT", "9100");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.database_url, "postgresql://b/two");
    assert_eq!(cfg.readonly_role.as_deref(), Some("reporter"));
    assert_eq!(cfg.port, 9100);

    unsafe { clear_server_env() };
}

#[test]
fn from_env_rejects_malformed_port() {
    let _env = env_lock();
    unsafe {
        clear_server_env();
        std::env::set_var("PORT", "eighty");
    }

    let err = AppConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("PORT"));
    assert!(err.contains("eighty"));

    unsafe { clear_server_env() };
}

#[test]
fn default_matches_unset_environment() {
    let _env = env_lock();
    unsafe { clear_server_env() };

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert!(cfg.static_dir.is_absolute());
}
