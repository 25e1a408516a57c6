//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, service wiring, and the Axum server
//! lifecycle.

use crate::application::services::AuthSettings;
use crate::config::Config;
use crate::infrastructure::auth::{
    JwtConfig, JwtTokenIssuer, LogConfirmationSender, RepositoryUserLookup,
};
use crate::infrastructure::persistence::{
    PgCategoryRepository, PgCommentRepository, PgGenreRepository, PgHealthCheck,
    PgReviewRepository, PgTitleRepository, PgUserRepository,
};
use crate::routes::app_router;
use crate::state::{AppState, AuthCapabilities, Repositories};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the connection pool using the configured limits.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Builds the application state on top of a PostgreSQL pool.
pub fn build_state(pool: PgPool, config: &Config) -> AppState {
    let pool = Arc::new(pool);

    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let repos = Repositories {
        users: users.clone(),
        categories: Arc::new(PgCategoryRepository::new(pool.clone())),
        genres: Arc::new(PgGenreRepository::new(pool.clone())),
        titles: Arc::new(PgTitleRepository::new(pool.clone())),
        reviews: Arc::new(PgReviewRepository::new(pool.clone())),
        comments: Arc::new(PgCommentRepository::new(pool.clone())),
        health: Arc::new(PgHealthCheck::new(pool)),
    };

    let jwt = JwtConfig {
        secret: config.jwt_secret.clone(),
        access_ttl_minutes: config.jwt_access_ttl_minutes,
    };

    let auth = AuthCapabilities {
        lookup: Arc::new(RepositoryUserLookup::new(users)),
        issuer: Arc::new(JwtTokenIssuer::new(&jwt)),
        sender: Arc::new(LogConfirmationSender),
        settings: AuthSettings {
            identifier_field: config.identifier_field,
            login_mode: config.login_mode,
            confirmation_key_length: config.confirmation_key_length,
        },
    };

    AppState::new(repos, auth, config.behind_proxy)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Services and authentication capabilities
/// - Axum HTTP server with graceful shutdown on Ctrl-C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let state = build_state(pool, &config);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
