mod config;
mod db;
mod llm;
mod models;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid server configuration");
    let port = config.port;

    let pool = db::init_pool(&config)
        .await
        .expect("database init failed");

    let llm: Option<Arc<dyn llm::LlmChat>> = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = %client.model(), "llm sql generation enabled");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "llm disabled; falling back to rule-based sql");
            None
        }
    };

    let state = state::AppState::new(pool, llm, config);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "ragsql listening");
    axum::serve(listener, app).await.expect("server failed");
}
