//! Policy Rating Service - API Server Binary
//!
//! This binary starts the HTTP API for policy management and premium quotes.
//!
//! # Usage
//!
//! ```bash
//! # Run against in-memory stores
//! cargo run --bin policy-api
//!
//! # Run against PostgreSQL
//! API_DATABASE_URL=postgres://... cargo run --bin policy-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_ISSUER` / `API_JWT_AUDIENCE` - Token issuer and audience
//! * `API_JWT_EXPIRATION_SECS` - Token lifetime in seconds (default: 86400)
//! * `API_DATABASE_URL` or `DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LOG_JSON` - Emit JSON log lines (default: false)
//! * `API_SEED_DEMO_DATA` - Seed empty stores with demo data (default: true)
//! * `API_BCRYPT_COST` - bcrypt work factor (default: 12)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresPolicyStore, PostgresSubscriberStore};
use interface_api::{config::ApiConfig, create_router, seed::seed_demo_data, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Failed to load configuration")?;

    init_tracing(&config.log_level, config.log_json);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting policy rating API server"
    );

    let state = build_state(config.clone()).await?;

    if config.seed_demo_data {
        seed_demo_data(&state.policies, &state.subscribers)
            .await
            .context("Failed to seed demo data")?;
    }

    let app = create_router(state);
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("Invalid server address")?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wires the services to PostgreSQL when a database URL is configured,
/// otherwise to in-memory stores.
async fn build_state(config: ApiConfig) -> anyhow::Result<AppState> {
    let Some(url) = config.database_url.clone() else {
        tracing::warn!("No database URL configured; data will not survive a restart");
        return Ok(AppState::in_memory(config));
    };

    tracing::info!("Connecting to database...");
    let pool = create_pool(DatabaseConfig::new(url))
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool).await.context("Failed to apply migrations")?;

    Ok(AppState::new(
        Arc::new(PostgresPolicyStore::new(pool.clone())),
        Arc::new(PostgresSubscriberStore::new(pool)),
        config,
    ))
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
