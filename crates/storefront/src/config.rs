//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_ADMIN_PASSWORD` - Shared password for the admin panel (min 8 chars)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `STOREFRONT_DATA_DIR` - Directory holding the JSON collections (default: data)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ADMIN_PASSWORD_LENGTH: usize = 8;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "admin123",
    "12345678",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
///
/// Implements `Debug` manually to redact the admin password.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory holding one JSON file per collection
    pub data_dir: PathBuf,
    /// Shared admin password
    pub admin_password: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("data_dir", &self.data_dir)
            .field("admin_password", &"[REDACTED]")
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[SET]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the admin password fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_BASE_URL".to_string(),
                "must start with http:// or https://".to_string(),
            ));
        }
        let data_dir = PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", "data"));
        let admin_password = get_required_secret("STOREFRONT_ADMIN_PASSWORD")?;
        validate_admin_password(&admin_password, "STOREFRONT_ADMIN_PASSWORD")?;

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            admin_password,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Compare a submitted password with the configured one.
    #[must_use]
    pub fn admin_password_matches(&self, candidate: &str) -> bool {
        self.admin_password.expose_secret() == candidate
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional, non-empty environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the admin password is long enough and not a placeholder.
fn validate_admin_password(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.chars().count() < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_ADMIN_PASSWORD_LENGTH,
                value.chars().count()
            ),
        ));
    }

    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            data_dir: PathBuf::from("data"),
            admin_password: SecretString::from("k9#Vq2!mLr"),
            sentry_dsn: Some("https://key@sentry.invalid/1".to_string()),
            sentry_environment: None,
        }
    }

    #[test]
    fn test_admin_password_too_short() {
        let secret = SecretString::from("short");
        let result = validate_admin_password(&secret, "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_admin_password_placeholder() {
        let secret = SecretString::from("my-password-here");
        assert!(validate_admin_password(&secret, "TEST_VAR").is_err());
        let secret = SecretString::from("CHANGEME-now");
        assert!(validate_admin_password(&secret, "TEST_VAR").is_err());
    }

    #[test]
    fn test_admin_password_valid() {
        let secret = SecretString::from("k9#Vq2!mLr");
        assert!(validate_admin_password(&secret, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_secure_cookies_follow_scheme() {
        let mut config = config();
        assert!(!config.secure_cookies());
        config.base_url = "https://clear-hearing.example".to_string();
        assert!(config.secure_cookies());
    }

    #[test]
    fn test_admin_password_matches() {
        let config = config();
        assert!(config.admin_password_matches("k9#Vq2!mLr"));
        assert!(!config.admin_password_matches("k9#Vq2!mL"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug_output = format!("{:?}", config());

        assert!(debug_output.contains("127.0.0.1"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("k9#Vq2!mLr"));
        assert!(!debug_output.contains("sentry.invalid"));
    }
}
