//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// JWT authentication settings
    pub jwt: JwtSettings,

    /// Bootstrap account used to obtain the first tokens
    #[serde(default)]
    pub auth: AuthSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Log output configuration
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply pending migrations from `migrations/` at startup
    pub run_migrations: bool,
}

/// JWT authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens
    pub secret: String,

    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,

    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

/// Optional account created at startup when it does not exist yet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSettings {
    pub bootstrap_username: Option<String>,
    pub bootstrap_password: Option<String>,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub format: LogFormat,
}

/// Minimum required length for JWT secret (256 bits = 32 bytes)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if JWT secret is too short.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("jwt.access_token_expiry_minutes", 60)?
            .set_default("jwt.refresh_token_expiry_days", 7)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=8000 -> server.port = 8000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .build()?
            .try_deserialize()
            .and_then(Self::validated)
    }

    /// Reject settings that would make the service insecure or unusable.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "JWT secret must be at least {} characters for security. Current length: {}",
                MIN_JWT_SECRET_LENGTH,
                self.jwt.secret.len()
            )));
        }

        if self.jwt.access_token_expiry_minutes <= 0 || self.jwt.refresh_token_expiry_days <= 0 {
            return Err(ConfigError::Message(
                "Token lifetimes must be positive".to_string(),
            ));
        }

        if self.auth.bootstrap_username.is_some() != self.auth.bootstrap_password.is_some() {
            return Err(ConfigError::Message(
                "auth.bootstrap_username and auth.bootstrap_password must be set together"
                    .to_string(),
            ));
        }

        Ok(self)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerSettings {
    /// Get the socket address for binding.
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_secret(secret: &str) -> Settings {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 8000,
            },
            database: DatabaseSettings {
                url: "postgres://localhost/test".into(),
                max_connections: 1,
                min_connections: 0,
                acquire_timeout: 1,
                run_migrations: false,
            },
            jwt: JwtSettings {
                secret: secret.into(),
                access_token_expiry_minutes: 60,
                refresh_token_expiry_days: 7,
            },
            auth: AuthSettings::default(),
            cors: CorsSettings {
                allowed_origins: vec![],
            },
            logging: LoggingSettings::default(),
            environment: "test".into(),
        }
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let result = settings_with_secret("too-short").validated();
        assert!(result.is_err());
    }

    #[test]
    fn long_jwt_secret_is_accepted() {
        let result = settings_with_secret(&"x".repeat(MIN_JWT_SECRET_LENGTH)).validated();
        assert!(result.is_ok());
    }

    #[test]
    fn bootstrap_credentials_must_come_in_pairs() {
        let mut settings = settings_with_secret(&"x".repeat(40));
        settings.auth.bootstrap_username = Some("admin".into());
        assert!(settings.validated().is_err());
    }

    #[test]
    fn socket_addr_parses_host_and_port() {
        let settings = settings_with_secret(&"x".repeat(40));
        let addr = settings.server.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
        assert_eq!(settings.server_addr(), "127.0.0.1:8000");
    }
}
