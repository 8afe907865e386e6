use restaurant_auth::{AuthConfig, ConfigError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Authentication and authorization configuration
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Errors produced while loading or validating [`AppConfig`].
#[derive(Debug, thiserror::Error)]
pub enum AppConfigError {
    #[error("config build error: {0}")]
    Build(String),

    #[error("config deserialize error: {0}")]
    Deserialize(String),

    #[error("{0}")]
    Invalid(String),

    #[error("auth: {0}")]
    Auth(#[from] ConfigError),
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppConfigError> {
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(AppConfigError::Invalid(format!(
                "logging.level must be one of {valid_levels:?}"
            )));
        }
        self.auth.validate()?;
        Ok(())
    }
}

pub mod loader {
    use super::{AppConfig, AppConfigError};
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_PATH: &str = "restaurant.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, AppConfigError> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_PATH));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., RESTAURANT__AUTH__TOKEN__ISSUER=...
        builder = builder.add_source(
            Environment::with_prefix("RESTAURANT")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| AppConfigError::Build(e.to_string()))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| AppConfigError::Deserialize(e.to_string()))?;
        merged.validate()?;
        Ok(merged)
    }
}
