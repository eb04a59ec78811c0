//! # Recruit Sales API
//!
//! Job-application tracking and sales analytics over one PostgreSQL database.
//!
//! This is the application entry point that initializes:
//! - Configuration loading
//! - Tracing/logging subsystem
//! - Database connection pool and migrations
//! - HTTP server

use anyhow::Result;
use tracing::info;

use recruit_sales_api::config::Settings;
use recruit_sales_api::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: it picks the log format
    let settings = Settings::load()?;

    recruit_sales_api::telemetry::init_tracing(settings.logging.format);

    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
