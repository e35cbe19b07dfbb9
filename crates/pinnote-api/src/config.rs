//! Server configuration read from the environment.

use std::str::FromStr;
use std::time::Duration;

use pinnote_core::defaults;
use pinnote_core::Error;
use pinnote_db::PoolConfig;
use tracing::warn;

/// Which note store the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// Process-local store; contents are lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(Error::Config(format!("unknown STORE_BACKEND '{}'", other))),
        }
    }
}

/// Runtime configuration for the API server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub host: String,
    pub port: u16,
    /// Raw comma-separated CORS origin allow-list.
    pub allowed_origins: String,
    pub max_body_bytes: usize,
    pub pool: PoolConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DATABASE_URL.to_string(),
            store_backend: StoreBackend::default(),
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            allowed_origins: defaults::ALLOWED_ORIGINS.to_string(),
            max_body_bytes: defaults::MAX_BODY_BYTES,
            pool: PoolConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Read configuration from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unparseable numbers fall back to their defaults with a warning; an
    /// unknown store backend is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let base = Self::default();

        let store_backend = match lookup("STORE_BACKEND") {
            Some(v) if !v.trim().is_empty() => v.parse()?,
            _ => base.store_backend,
        };

        let pool = PoolConfig::new()
            .max_connections(parse_or(
                &lookup,
                "DB_MAX_CONNECTIONS",
                base.pool.max_connections,
            ))
            .connect_timeout(Duration::from_secs(parse_or(
                &lookup,
                "DB_CONNECT_TIMEOUT_SECS",
                base.pool.connect_timeout.as_secs(),
            )));

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(base.database_url),
            store_backend,
            host: lookup("HOST").unwrap_or(base.host),
            port: parse_or(&lookup, "PORT", base.port),
            allowed_origins: lookup("ALLOWED_ORIGINS").unwrap_or(base.allowed_origins),
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", base.max_body_bytes),
            pool,
        })
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(
                subsystem = "config",
                key,
                value = %raw,
                default = %default,
                "Invalid numeric setting, using default"
            );
            default
        }),
    }
}
