//! # Configuration Settings
//!
//! Defines the configuration structure for the Tasklane session service.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Seven days, the lifetime of a login session.
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 604_800;

/// One year, the longest accepted session lifetime.
pub const MAX_SESSION_TTL_SECONDS: u64 = 31_536_000;

/// Shortest accepted session issuer key.
pub const MIN_ISSUER_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    /// HTTP server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Session lifecycle configuration
    #[validate(nested)]
    pub session: SessionConfig,

    /// Key-value store configuration
    #[validate(nested)]
    pub store: StoreConfig,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load every section from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            server: ServerConfig::from_env()?,
            session: SessionConfig::from_env()?,
            store: StoreConfig::from_env()?,
            observability: ObservabilityConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        self.validate_custom()
    }

    /// Cross-field rules the validator derive cannot express
    fn validate_custom(&self) -> Result<()> {
        if self.observability.enable_metrics && self.server.port == self.observability.metrics_port
        {
            return Err(Error::validation("Server and metrics ports cannot be the same"));
        }

        if !self.session.key_prefix.ends_with(':') {
            return Err(Error::validation_field(
                "Session key prefix must end with ':'",
                "session.key_prefix",
            ));
        }

        if self.store.backend == StoreBackend::Redis
            && !self.store.redis_url.starts_with("redis://")
            && !self.store.redis_url.starts_with("rediss://")
        {
            return Err(Error::validation_field(
                "Redis URL must start with 'redis://' or 'rediss://'",
                "store.redis_url",
            ));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, max = 65535, message = "Port must be between 1 and 65535"))]
    pub port: u16,

    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8080, enable_cors: true }
    }
}

impl ServerConfig {
    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Create ServerConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let host = std::env::var("TASKLANE_HOST").unwrap_or(defaults.host);

        let port = match std::env::var("TASKLANE_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| Error::config(format!("Invalid TASKLANE_PORT '{}': {}", raw, e)))?,
            Err(_) => defaults.port,
        };

        let enable_cors = std::env::var("TASKLANE_ENABLE_CORS")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(defaults.enable_cors);

        Ok(Self { host, port, enable_cors })
    }
}

/// Session lifecycle configuration
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct SessionConfig {
    /// Session lifetime, applied both as the store TTL and the record's `expiresAt`
    #[validate(range(
        min = 60,
        max = 31_536_000,
        message = "Session TTL must be between 60 seconds and one year"
    ))]
    pub ttl_seconds: u64,

    /// Prefix prepended to every token to form its store key
    #[validate(length(min = 1, max = 64, message = "Key prefix must be 1-64 characters"))]
    pub key_prefix: String,

    /// Name of the cookie carrying the session token
    #[validate(length(min = 1, message = "Cookie name cannot be empty"))]
    pub cookie_name: String,

    /// Set the Secure flag on the session cookie
    pub cookie_secure: bool,

    /// Shared key the identity proxy presents to issue sessions; issuing is off when unset
    #[serde(skip_serializing)]
    #[validate(length(min = 32, message = "Issuer secret must be at least 32 characters"))]
    pub issuer_secret: Option<String>,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("key_prefix", &self.key_prefix)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("issuer_secret", &self.issuer_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            key_prefix: "session:".to_string(),
            cookie_name: "tasklane_session".to_string(),
            cookie_secure: true,
            issuer_secret: None,
        }
    }
}

impl SessionConfig {
    /// Get session lifetime as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Create SessionConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let ttl_seconds = match std::env::var("TASKLANE_SESSION_TTL_SECONDS") {
            Ok(raw) => raw.parse().map_err(|e| {
                Error::config(format!("Invalid TASKLANE_SESSION_TTL_SECONDS '{}': {}", raw, e))
            })?,
            Err(_) => defaults.ttl_seconds,
        };

        let key_prefix =
            std::env::var("TASKLANE_SESSION_KEY_PREFIX").unwrap_or(defaults.key_prefix);

        let cookie_name = std::env::var("TASKLANE_SESSION_COOKIE").unwrap_or(defaults.cookie_name);

        let cookie_secure = std::env::var("TASKLANE_COOKIE_SECURE")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(defaults.cookie_secure);

        let issuer_secret = std::env::var("TASKLANE_SESSION_ISSUER_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self { ttl_seconds, key_prefix, cookie_name, cookie_secure, issuer_secret })
    }
}

/// Session store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map, for development and tests
    Memory,
    /// Remote Redis server
    Redis,
}

impl std::str::FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            other => Err(Error::config(format!(
                "Unknown store backend '{}'; expected 'memory' or 'redis'",
                other
            ))),
        }
    }
}

/// Key-value store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreConfig {
    /// Which backend holds session records
    pub backend: StoreBackend,

    /// Redis connection URL (used when `backend` is `redis`)
    #[validate(length(min = 1, message = "Redis URL cannot be empty"))]
    pub redis_url: String,

    /// Interval between expired-record sweeps of the memory backend
    #[validate(range(
        min = 1,
        max = 3600,
        message = "Sweep interval must be between 1 and 3600 seconds"
    ))]
    pub sweep_interval_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            sweep_interval_seconds: 60,
        }
    }
}

impl StoreConfig {
    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    /// Create StoreConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let backend = match std::env::var("TASKLANE_STORE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.backend,
        };

        let redis_url = std::env::var("REDIS_URL").unwrap_or(defaults.redis_url);

        let sweep_interval_seconds = std::env::var("TASKLANE_STORE_SWEEP_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.sweep_interval_seconds);

        Ok(Self { backend, redis_url, sweep_interval_seconds })
    }
}

/// Observability configuration for logging and metrics
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Enable metrics collection
    pub enable_metrics: bool,

    /// Prometheus exporter port (0 = disabled)
    pub metrics_port: u16,

    /// Service name attached to metrics and logs
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            enable_metrics: false,
            metrics_port: 9090,
            service_name: "tasklane".to_string(),
            log_level: "info".to_string(),
            json_logging: false,
        }
    }
}

impl ObservabilityConfig {
    /// Get metrics bind address (None if disabled)
    pub fn metrics_bind_address(&self) -> Option<String> {
        if self.metrics_port == 0 {
            None
        } else {
            Some(format!("0.0.0.0:{}", self.metrics_port))
        }
    }

    /// Create ObservabilityConfig from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let enable_metrics = std::env::var("TASKLANE_ENABLE_METRICS")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(defaults.enable_metrics);

        let metrics_port = std::env::var("TASKLANE_METRICS_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(defaults.metrics_port);

        let service_name = std::env::var("TASKLANE_SERVICE_NAME").unwrap_or(defaults.service_name);

        let log_level = std::env::var("TASKLANE_LOG_LEVEL").unwrap_or(defaults.log_level);

        let json_logging = std::env::var("TASKLANE_LOG_JSON")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(defaults.json_logging);

        Self { enable_metrics, metrics_port, service_name, log_level, json_logging }
    }
}
