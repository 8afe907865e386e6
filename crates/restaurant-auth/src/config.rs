//! Authentication and authorization configuration.
//!
//! Token signing settings and audit toggles. Policies themselves are not
//! configurable here; they are registered in code at process start.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum length of the symmetric signing key, in bytes (HS256).
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Root authentication and authorization configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// enabled = true
///
/// [auth.token]
/// issuer = "http://restaurant-api.local"
/// signing_key = "PRIVATE_KEY_DONT_SHARE_0123456789"
/// lifetime = "15days"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Enable/disable authentication entirely.
    /// When disabled, every caller is anonymous and every policy fails.
    pub enabled: bool,

    /// Token issuing configuration.
    pub token: TokenConfig,

    /// Audit configuration.
    pub audit: AuditConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token: TokenConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

/// Token issuing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Issuer, also used as the audience of issued tokens.
    pub issuer: String,

    /// Symmetric HS256 signing key.
    pub signing_key: String,

    /// How long an issued token stays valid.
    #[serde(with = "humantime_serde")]
    pub lifetime: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: "http://restaurant-api.local".to_string(),
            signing_key: String::new(),
            lifetime: Duration::from_secs(15 * 24 * 3600), // 15 days
        }
    }
}

/// Audit logging configuration.
///
/// Controls which authentication/authorization events are logged at info level.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Log access control decisions.
    pub log_access_decisions: bool,

    /// Log failed login attempts.
    pub log_failed_auth: bool,

    /// Log successful logins.
    pub log_successful_auth: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_access_decisions: true,
            log_failed_auth: true,
            log_successful_auth: true,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the signing key is empty and
    /// `ConfigError::InvalidValue` if:
    /// - The issuer is empty
    /// - The signing key is shorter than [`MIN_SIGNING_KEY_LEN`] bytes
    /// - The token lifetime is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.token.issuer.is_empty() {
            return Err(ConfigError::InvalidValue(
                "token.issuer cannot be empty".to_string(),
            ));
        }

        if self.token.signing_key.is_empty() {
            return Err(ConfigError::Missing("token.signing_key".to_string()));
        }

        if self.token.signing_key.len() < MIN_SIGNING_KEY_LEN {
            return Err(ConfigError::InvalidValue(format!(
                "token.signing_key must be at least {} bytes",
                MIN_SIGNING_KEY_LEN
            )));
        }

        if self.token.lifetime.is_zero() {
            return Err(ConfigError::InvalidValue(
                "token.lifetime must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
