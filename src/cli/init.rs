//! Init command implementation
//!
//! Writes a commented `pension-desk.toml` with the default endpoints, plus a
//! `.env.example` listing the environment overrides.

use super::output::Output;
use crate::utils::toml_config::DeskConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    Success,
    /// The configuration file exists and `--force` was not given
    AlreadyExists,
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Configuration file to write
    pub config_path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Backend API base URL
    pub api_url: String,
    /// Identity-provider base URL, e.g. `http://localhost:8088`
    pub identity_url: String,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.header("Initializing pension-desk");

    if config.config_path.exists() && !config.force {
        output.warning(&format!("{} already exists!", config.config_path.display()));
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let content = generate_desk_toml(&config);

    // Refuse to write something the loader would reject.
    if let Err(e) = DeskConfig::from_toml(&content).and_then(|c| c.validate()) {
        output.error(&format!("Generated configuration is invalid: {}", e));
        return InitResult::Error(e.to_string());
    }

    if let Err(e) = write_file(&config.config_path, &content) {
        output.error(&format!(
            "Failed to create {}: {}",
            config.config_path.display(),
            e
        ));
        return InitResult::Error(e.to_string());
    }
    output.created("config", &config.config_path.display().to_string());

    let env_path = config
        .config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(".env.example");
    if !env_path.exists() || config.force {
        match write_file(&env_path, ENV_EXAMPLE) {
            Ok(()) => output.created("env", &env_path.display().to_string()),
            Err(e) => output.warning(&format!("Failed to create .env.example: {}", e)),
        }
    }

    output.header("Next Steps");
    output.info("1. Sign in at the identity provider and copy your access token");
    output.info("2. Store it:");
    output.command("pension-desk login --token <access-token>");
    output.info("3. Check the session:");
    output.command("pension-desk whoami");

    InitResult::Success
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)
}

fn generate_desk_toml(config: &InitConfig) -> String {
    let identity = config.identity_url.trim_end_matches('/');
    format!(
        r#"# pension-desk configuration
# Every value can be overridden with a PENSION_DESK_* environment variable.

[api]
# Base URL of the case-management REST API (PENSION_DESK_API_URL)
base_url = "{api}"

[identity]
# Where unauthenticated users are sent (PENSION_DESK_LOGIN_URL)
login_url = "{identity}/oauth2/authorization/keycloak"
# Identity-provider logout endpoint (PENSION_DESK_LOGOUT_URL)
logout_url = "{identity}/logout"

[session]
# File holding the bearer token (PENSION_DESK_TOKEN_PATH)
token_path = ".pension-desk/token"

[logging]
# trace, debug, info, warn or error (PENSION_DESK_LOG)
level = "info"
"#,
        api = config.api_url.trim_end_matches('/'),
        identity = identity,
    )
}

const ENV_EXAMPLE: &str = r#"# pension-desk environment overrides
# Copy this file to .env and adjust.

# PENSION_DESK_API_URL=http://localhost:8088/api
# PENSION_DESK_LOGIN_URL=http://localhost:8088/oauth2/authorization/keycloak
# PENSION_DESK_LOGOUT_URL=http://localhost:8088/logout
# PENSION_DESK_TOKEN_PATH=.pension-desk/token
# PENSION_DESK_LOG=info
"#;
