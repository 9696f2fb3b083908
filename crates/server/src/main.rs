//! GreenBasket server binary.
//!
//! Serves the mobile storefront's REST API.
//!
//! # Architecture
//!
//! - Axum web framework, JSON envelope responses
//! - Stateless bearer-JWT authentication
//! - `PostgreSQL` via sqlx for all persistence

#![cfg_attr(not(test), forbid(unsafe_code))]

use greenbasket_server::config::ServerConfig;
use greenbasket_server::state::AppState;
use greenbasket_server::{app, db};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "greenbasket_server=info,tower_http=debug".into());

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Initialize database connection pool
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p greenbasket-cli -- migrate

    let addr = config.socket_addr();
    let state = AppState::new(config, pool);
    let app = app(state);

    tracing::info!("server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
