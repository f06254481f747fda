//! Assistant configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STYLE_MINGLE_HOST` - Bind address (default: 127.0.0.1)
//! - `STYLE_MINGLE_PORT` - Listen port (default: 3000)
//! - `STYLE_MINGLE_CATALOG_PATH` - JSON or YAML catalog (default: bundled demo catalog)
//! - `STYLE_MINGLE_SWIPE_THRESHOLD_PX` - Drag distance that counts as a swipe (default: 50)
//! - `STYLE_MINGLE_SETTLE_DELAY_MS` - Delay before a swipe decision commits (default: 500)
//! - `STYLE_MINGLE_SESSION_IDLE_SECS` - Idle time before a session is dropped (default: 1800)
//! - `STYLE_MINGLE_SECURE_COOKIES` - Mark session cookies `Secure` (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use style_mingle_core::swipe::GestureConfig;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Assistant service configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog document to load instead of the bundled one
    pub catalog_path: Option<PathBuf>,
    /// Drag classification for the swipe gesture endpoint
    pub gesture: GestureConfig,
    /// How long a liked or disliked card settles before the decision commits
    pub settle_delay: Duration,
    /// Idle time after which a shopper's swipe state is dropped
    pub session_idle: Duration,
    /// Whether session cookies require HTTPS
    pub secure_cookies: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl AssistantConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let threshold: f64 = env.parse_or("STYLE_MINGLE_SWIPE_THRESHOLD_PX", "50")?;
        let gesture = GestureConfig::new(threshold).map_err(|e| {
            ConfigError::InvalidEnvVar("STYLE_MINGLE_SWIPE_THRESHOLD_PX".to_string(), e.to_string())
        })?;

        Ok(Self {
            host: env.parse_or("STYLE_MINGLE_HOST", "127.0.0.1")?,
            port: env.parse_or("STYLE_MINGLE_PORT", "3000")?,
            catalog_path: env.optional("STYLE_MINGLE_CATALOG_PATH").map(PathBuf::from),
            gesture,
            settle_delay: Duration::from_millis(env.parse_or("STYLE_MINGLE_SETTLE_DELAY_MS", "500")?),
            session_idle: Duration::from_secs(
                env.parse_or("STYLE_MINGLE_SESSION_IDLE_SECS", "1800")?,
            ),
            secure_cookies: env.parse_or("STYLE_MINGLE_SECURE_COOKIES", "false")?,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.parse_or("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            catalog_path: None,
            gesture: GestureConfig::default(),
            settle_delay: Duration::from_millis(500),
            session_idle: Duration::from_secs(1800),
            secure_cookies: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.optional(key).unwrap_or_else(|| default.to_string());
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}
