//! TOML-based configuration for pension-desk
//!
//! Backend and identity-provider endpoints, the token location and the log
//! level are read once at process start from `pension-desk.toml`, then
//! overlaid with `PENSION_DESK_*` environment variables.
//!
//! A missing file is not an error: the defaults target a backend running on
//! `localhost:8088`.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "pension-desk.toml";

/// Root configuration structure loaded from pension-desk.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============= API Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every REST path is appended to
    #[serde(default = "default_api_url")]
    pub base_url: String,
}

fn default_api_url() -> String {
    "http://localhost:8088/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
        }
    }
}

// ============= Identity Provider Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Authorization endpoint users are sent to when unauthenticated
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Endpoint that terminates the identity-provider session
    #[serde(default = "default_logout_url")]
    pub logout_url: String,
}

fn default_login_url() -> String {
    "http://localhost:8088/oauth2/authorization/keycloak".to_string()
}

fn default_logout_url() -> String {
    "http://localhost:8088/logout".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            logout_url: default_logout_url(),
        }
    }
}

// ============= Session Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File holding the bearer token between invocations
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

fn default_token_path() -> PathBuf {
    PathBuf::from(".pension-desk/token")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
        }
    }
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Config(err.to_string())
    }
}

impl DeskConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist, then apply environment overrides and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            debug!("No configuration file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration document without touching the environment.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay `PENSION_DESK_*` variables using the given lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("PENSION_DESK_API_URL") {
            self.api.base_url = url;
        }
        if let Some(url) = non_empty("PENSION_DESK_LOGIN_URL") {
            self.identity.login_url = url;
        }
        if let Some(url) = non_empty("PENSION_DESK_LOGOUT_URL") {
            self.identity.logout_url = url;
        }
        if let Some(path) = non_empty("PENSION_DESK_TOKEN_PATH") {
            self.session.token_path = PathBuf::from(path);
        }
        if let Some(level) = non_empty("PENSION_DESK_LOG") {
            self.logging.level = level;
        }
    }

    /// Validate URLs and paths
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("api.base_url", &self.api.base_url)?;
        validate_http_url("identity.login_url", &self.identity.login_url)?;
        validate_http_url("identity.logout_url", &self.identity.logout_url)?;

        if self.session.token_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "session.token_path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Render the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| {
        ConfigError::ValidationError(format!("{} is not a valid URL ({}): {}", field, value, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::ValidationError(format!(
            "{} must use http or https, got '{}'",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn create_test_config() -> String {
        r#"
[api]
base_url = "https://pensions.example.org/api"

[identity]
login_url = "https://sso.example.org/oauth2/authorization/keycloak"
logout_url = "https://sso.example.org/logout"

[session]
token_path = "/tmp/pension-desk/token"

[logging]
level = "debug"
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        let config = DeskConfig::from_toml(&create_test_config()).expect("should parse");

        assert_eq!(config.api.base_url, "https://pensions.example.org/api");
        assert_eq!(config.identity.logout_url, "https://sso.example.org/logout");
        assert_eq!(
            config.session.token_path,
            PathBuf::from("/tmp/pension-desk/token")
        );
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = DeskConfig::from_toml("").expect("should parse");
        assert_eq!(config, DeskConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:8088/api");
        assert_eq!(
            config.identity.login_url,
            "http://localhost:8088/oauth2/authorization/keycloak"
        );
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = DeskConfig::from_toml("[identity]\nlogout_url = \"http://idp/logout\"\n")
            .expect("should parse");
        assert_eq!(config.identity.logout_url, "http://idp/logout");
        assert_eq!(config.identity.login_url, default_login_url());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let result = DeskConfig::from_toml("[api\nbase_url = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PENSION_DESK_API_URL", "http://backend:9000/api"),
            ("PENSION_DESK_LOG", "trace"),
            ("PENSION_DESK_LOGIN_URL", "   "),
        ]
        .into_iter()
        .collect();

        let mut config = DeskConfig::default();
        config.apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://backend:9000/api");
        assert_eq!(config.logging.level, "trace");
        // blank values are ignored
        assert_eq!(config.identity.login_url, default_login_url());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = DeskConfig::default();
        config.api.base_url = "ftp://example.org/api".to_string();

        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_unparseable_url() {
        let mut config = DeskConfig::default();
        config.identity.login_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_token_path() {
        let mut config = DeskConfig::default();
        config.session.token_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = DeskConfig::load(dir.path().join("absent.toml")).expect("should load");
        assert_eq!(config.session.token_path, default_token_path());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = DeskConfig::from_toml(&create_test_config()).expect("should parse");
        let rendered = config.to_toml().expect("should render");
        let reparsed = DeskConfig::from_toml(&rendered).expect("should reparse");
        assert_eq!(config, reparsed);
    }
}
