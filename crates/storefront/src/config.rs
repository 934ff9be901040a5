//! Storefront configuration loaded from environment variables.
//!
//! The configuration is built once at startup and handed to the application
//! state; nothing reads the environment after that.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAZAAR_MONGODB_URI` (or `MONGODB_URI`) - MongoDB connection string,
//!   only when `BAZAAR_STORE=mongodb`
//!
//! ## Optional
//! - `BAZAAR_HOST` - Bind address (default: 127.0.0.1)
//! - `BAZAAR_PORT` - Listen port (default: 8080)
//! - `BAZAAR_BASE_URL` - Public URL used in the API index (default: `http://{host}:{port}`)
//! - `BAZAAR_STORE` - `mongodb` or `memory` (default: mongodb)
//! - `BAZAAR_DATABASE` - MongoDB database name (default: webapp)
//! - `BAZAAR_PICTURE_DIR` - Directory for uploaded pictures (default: ./picture)
//! - `BAZAAR_TOKEN_TTL_SECS` - Bearer token lifetime in seconds (default: 7200)
//! - `BAZAAR_TOKEN_SECRET` - `credentials` or `random` (default: credentials)
//! - `BAZAAR_FORM_POLICY` - `strict` or `lenient` (default: strict)
//! - `BAZAAR_COMMENT_MATCH` - `author` or `exact` (default: author)
//! - `BAZAAR_CORS_PERMISSIVE` - Allow any origin/method/header (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::db::CommentMatch;
use crate::routes::form::FormPolicy;
use crate::services::token::SecretMode;

const DEFAULT_TOKEN_TTL_SECS: u64 = 2 * 60 * 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used to render the API index
    pub base_url: String,
    /// Document store backend
    pub store: StoreConfig,
    /// Collection names inside the database
    pub collections: Collections,
    /// Directory holding uploaded pictures
    pub picture_dir: PathBuf,
    /// Bearer token settings
    pub token: TokenConfig,
    /// How strictly form numbers are parsed
    pub form_policy: FormPolicy,
    /// Which comments a DELETE removes
    pub comment_match: CommentMatch,
    /// Attach a permissive CORS layer
    pub cors_permissive: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Document store selection.
///
/// Implements `Debug` manually to redact the connection string.
#[derive(Clone)]
pub enum StoreConfig {
    /// MongoDB deployment.
    MongoDb {
        /// Connection string (may contain credentials)
        uri: SecretString,
        /// Database holding the collections
        database: String,
    },
    /// Process-local store, lost on restart.
    Memory,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MongoDb { database, .. } => f
                .debug_struct("MongoDb")
                .field("uri", &"[REDACTED]")
                .field("database", database)
                .finish(),
            Self::Memory => f.write_str("Memory"),
        }
    }
}

/// Collection names, one per entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    pub commodities: String,
    pub comments: String,
    pub users: String,
    pub carts: String,
    pub tokens: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            commodities: "commodity".to_string(),
            comments: "comment".to_string(),
            users: "user".to_string(),
            carts: "cart".to_string(),
            tokens: "token".to_string(),
        }
    }
}

/// Bearer token settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenConfig {
    /// Lifetime of an issued token
    pub ttl: Duration,
    /// How signing secrets are derived
    pub secret: SecretMode,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            secret: SecretMode::default(),
        }
    }
}

impl Default for StorefrontConfig {
    /// In-memory configuration on 127.0.0.1:8080, used by tests and local runs.
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            base_url: "http://127.0.0.1:8080".to_string(),
            store: StoreConfig::Memory,
            collections: Collections::default(),
            picture_dir: PathBuf::from("./picture"),
            token: TokenConfig::default(),
            form_policy: FormPolicy::default(),
            comment_match: CommentMatch::default(),
            cors_permissive: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host: IpAddr = parse_env("BAZAAR_HOST", "127.0.0.1")?;
        let port: u16 = parse_env("BAZAAR_PORT", "8080")?;
        let base_url = get_optional_env("BAZAAR_BASE_URL")
            .unwrap_or_else(|| format!("http://{host}:{port}"));

        let store = match get_env_or_default("BAZAAR_STORE", "mongodb").as_str() {
            "mongodb" => StoreConfig::MongoDb {
                uri: get_mongodb_uri("BAZAAR_MONGODB_URI")?,
                database: get_env_or_default("BAZAAR_DATABASE", "webapp"),
            },
            "memory" => StoreConfig::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "BAZAAR_STORE".to_string(),
                    format!("expected 'mongodb' or 'memory', got '{other}'"),
                ));
            }
        };

        let ttl_secs: u64 =
            parse_env("BAZAAR_TOKEN_TTL_SECS", &DEFAULT_TOKEN_TTL_SECS.to_string())?;
        let token = TokenConfig {
            ttl: Duration::from_secs(ttl_secs),
            secret: parse_env("BAZAAR_TOKEN_SECRET", "credentials")?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            store,
            collections: Collections::default(),
            picture_dir: PathBuf::from(get_env_or_default("BAZAAR_PICTURE_DIR", "./picture")),
            token,
            form_policy: parse_env("BAZAAR_FORM_POLICY", "strict")?,
            comment_match: parse_env("BAZAAR_COMMENT_MATCH", "author")?,
            cors_permissive: parse_env("BAZAAR_CORS_PERMISSIVE", "false")?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get MongoDB URI with fallback to generic `MONGODB_URI`.
fn get_mongodb_uri(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("MONGODB_URI") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
