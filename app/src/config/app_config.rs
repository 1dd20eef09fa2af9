use anyhow::Result;
use serde::Deserialize;
use std::env;
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Configuration-specific error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Main application configuration containing all subsystem configs
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Token verification configuration
    pub auth: AuthConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "127.0.0.1" or "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Upper bound for `leeway_seconds`; one day.
pub const MAX_LEEWAY_SECONDS: u64 = 24 * 60 * 60;

/// Token verification configuration
///
/// Loaded once at startup and handed to the resolver; nothing reads
/// `JWT_SECRET` from the environment after this point.
#[derive(Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret. `None` when unset or empty.
    pub jwt_secret: Option<String>,
    /// Clock tolerance applied to `exp` and `nbf`, in seconds
    pub leeway_seconds: u64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl AuthConfig {
    pub fn with_secret(secret: impl Into<String>) -> Self {
        AuthConfig {
            jwt_secret: Self::non_empty(Some(secret.into())),
            leeway_seconds: 0,
        }
    }

    fn non_empty(secret: Option<String>) -> Option<String> {
        secret.filter(|s| !s.is_empty())
    }
}

// =============================================================================
// Implementation
// =============================================================================

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// ## Server Configuration
    /// - `SERVER_HOST`: Server bind address (default: "127.0.0.1")
    /// - `SERVER_PORT`: Server port (default: "8000")
    ///
    /// ## Auth Configuration
    /// - `JWT_SECRET`: HMAC secret used to verify bearer tokens (no default)
    /// - `JWT_LEEWAY_SECONDS`: Clock tolerance for `exp`/`nbf` (default: "0")
    ///
    /// A missing `JWT_SECRET` is not an error: the server starts and every
    /// token is rejected.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric variable contains an invalid value.
    pub fn from_env() -> Result<Self> {
        Ok(AppConfig {
            server: Self::load_server_config()?,
            auth: Self::load_auth_config()?,
        })
    }

    /// Load server configuration from environment
    fn load_server_config() -> Result<ServerConfig> {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = Self::parse_u16_env("SERVER_PORT", "8000")?;

        Ok(ServerConfig { host, port })
    }

    /// Load token verification configuration from environment
    fn load_auth_config() -> Result<AuthConfig> {
        let leeway = env::var("JWT_LEEWAY_SECONDS").unwrap_or_else(|_| "0".to_string());

        Self::build_auth_config(env::var("JWT_SECRET").ok(), &leeway)
    }

    fn build_auth_config(jwt_secret: Option<String>, leeway: &str) -> Result<AuthConfig> {
        let jwt_secret = AuthConfig::non_empty(jwt_secret);
        if jwt_secret.is_none() {
            log::warn!("JWT_SECRET is not set; every bearer token will be rejected");
        }

        let leeway_seconds: u64 = Self::parse_value("JWT_LEEWAY_SECONDS", leeway)?;
        if leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(ConfigError::InvalidEnvVar {
                var: "JWT_LEEWAY_SECONDS".to_string(),
                reason: format!(
                    "must be at most {} seconds, got {}",
                    MAX_LEEWAY_SECONDS, leeway_seconds
                ),
            }
            .into());
        }

        Ok(AuthConfig {
            jwt_secret,
            leeway_seconds,
        })
    }

    /// Parse a u16 value from environment variable with default fallback
    fn parse_u16_env(var_name: &str, default_value: &str) -> Result<u16> {
        let value_str = env::var(var_name).unwrap_or_else(|_| default_value.to_string());
        Ok(Self::parse_value(var_name, &value_str)?)
    }

    fn parse_value<T: std::str::FromStr>(var_name: &str, value_str: &str) -> Result<T, ConfigError> {
        value_str.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
            var: var_name.to_string(),
            reason: format!("expected a valid number, got '{}'", value_str),
        })
    }
}
