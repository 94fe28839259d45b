//! CMS API server
//!
//! Boot sequence: load config, connect the database pool, run migrations,
//! build the router, serve with graceful shutdown. `--seed` inserts the
//! bootstrap admin account and exits.

use anyhow::Result;
use cms_api::{config, db, routes, state::AppState};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting CMS API"
    );

    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database.url, config.database.max_connections).await?;

    // Run migrations (skip in production if using a separate migration job)
    if !config::AppConfig::is_production() {
        db::run_migrations(&db_pool).await?;
    }

    if std::env::args().any(|arg| arg == "--seed") {
        info!("Seeding database...");
        db::seed_admin(&db_pool).await?;
        db::seed_categories(&db_pool).await?;
        return Ok(());
    }

    let state = AppState::new(db_pool, config.clone());
    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "cms_api=info,tower_http=info".into()
        } else {
            "cms_api=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.jwt.secret.contains("development") || config.jwt.secret.len() < 32 {
        errors.push("JWT secret must be at least 32 characters and not contain 'development'");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
