//! Configuration module for the registrar service.

use serde::Deserialize;
use std::path::Path;

use crate::{RegistrarError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin (development mode).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
    /// Upper bound in seconds for acquiring a connection or waiting on a lock.
    #[serde(default = "default_db_timeout")]
    pub timeout_secs: u64,
}

fn default_db_path() -> String {
    "data/registrar.db".to_string()
}

fn default_db_max_connections() -> u32 {
    5
}

fn default_db_timeout() -> u64 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_db_max_connections(),
            timeout_secs: default_db_timeout(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign session tokens.
    #[serde(default)]
    pub jwt_secret: String,
    /// Session token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    /// Argon2 time cost (iterations).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// Argon2 parallelism.
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

fn default_token_ttl() -> u64 {
    86_400
}

fn default_argon2_memory() -> u32 {
    19_456
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_argon2_parallelism() -> u32 {
    1
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

/// First superadmin created at startup when none is active.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    /// Username of the bootstrap account.
    #[serde(default = "default_bootstrap_username")]
    pub username: String,
    /// Email of the bootstrap account.
    #[serde(default = "default_bootstrap_email")]
    pub email: String,
    /// Display name of the bootstrap account.
    #[serde(default = "default_bootstrap_full_name")]
    pub full_name: String,
    /// Initial password. Bootstrap is skipped when unset.
    #[serde(default)]
    pub password: Option<String>,
}

fn default_bootstrap_username() -> String {
    "superadmin".to_string()
}

fn default_bootstrap_email() -> String {
    "superadmin@localhost".to_string()
}

fn default_bootstrap_full_name() -> String {
    "Super Administrator".to_string()
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            username: default_bootstrap_username(),
            email: default_bootstrap_email(),
            full_name: default_bootstrap_full_name(),
            password: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file, written in addition to stdout.
    #[serde(default)]
    pub file: Option<String>,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            format: LogFormat::default(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Bootstrap superadmin configuration.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RegistrarError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| RegistrarError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `REGISTRAR_JWT_SECRET`: token signing secret
    /// - `REGISTRAR_BOOTSTRAP_PASSWORD`: password of the bootstrap superadmin
    /// - `REGISTRAR_DATABASE_PATH`: SQLite database file
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(secret) = non_empty_env("REGISTRAR_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(password) = non_empty_env("REGISTRAR_BOOTSTRAP_PASSWORD") {
            self.bootstrap.password = Some(password);
        }
        if let Some(path) = non_empty_env("REGISTRAR_DATABASE_PATH") {
            self.database.path = path;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(RegistrarError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via REGISTRAR_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(RegistrarError::Config(
                "token_ttl_secs must be greater than zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(RegistrarError::Config(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
