//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::application::services::{AuthService, AuthServiceImpl};
use crate::config::Settings;
use crate::infrastructure::database;
use crate::infrastructure::repositories::{PgSessionRepository, PgUserRepository};
use crate::presentation::http::{handlers, routes};
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub settings: Arc<Settings>,
}

/// Router with every middleware layer applied. Does not touch the database.
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);

    // Outermost first: CORS, then tracing, then compression.
    // Router::layer wraps outward, so the last call is the outermost layer.
    routes::create_router(state)
        .layer(CompressionLayer::new())
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        handlers::health::init_server_start();

        let db = database::create_pool(&settings.database)
            .await
            .context("failed to connect to the database")?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&db)
                .await
                .context("failed to run migrations")?;
            tracing::info!("Database migrations applied");
        }

        bootstrap_account(&db, &settings).await?;

        let addr: SocketAddr = settings
            .server
            .socket_addr()
            .with_context(|| format!("invalid server address {}", settings.server_addr()))?;

        let state = AppState {
            db,
            settings: Arc::new(settings),
        };
        let router = build_router(state);

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

/// Create the configured API account when it does not exist yet.
async fn bootstrap_account(db: &PgPool, settings: &Settings) -> Result<()> {
    let (Some(username), Some(password)) = (
        settings.auth.bootstrap_username.as_deref(),
        settings.auth.bootstrap_password.as_deref(),
    ) else {
        return Ok(());
    };

    let auth_service = AuthServiceImpl::new(
        Arc::new(PgUserRepository::new(db.clone())),
        Arc::new(PgSessionRepository::new(db.clone())),
        settings.jwt.clone(),
    );

    let user = auth_service
        .ensure_user(username, password)
        .await
        .map_err(|e| anyhow::anyhow!("failed to create bootstrap account: {}", e))?;
    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap account ready");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
