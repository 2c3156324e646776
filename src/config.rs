//! Configuration management for the gatehouse server
//!
//! Values come from built-in defaults, an optional `config.toml` and
//! `GATEHOUSE__*` environment overrides, in that order of precedence.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    // ═══ NETWORK ═══
    /// IP address the HTTP listener binds to
    pub bind_address: String,

    /// Port for the HTTP listener
    pub port: u16,

    // ═══ USER STORE ═══
    /// JSON document holding every user record
    pub users_file: String,

    /// PBKDF2 rounds applied to newly stored passwords
    pub password_iterations: u32,

    // ═══ SESSIONS ═══
    /// Name of the cookie carrying the session token
    pub cookie_name: String,

    /// Idle lifetime of a logged-in session
    pub session_ttl_secs: u64,

    /// Idle lifetime of a session with no identity
    pub anonymous_session_ttl_secs: u64,

    /// Interval between expired-session sweeps
    pub session_sweep_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            users_file: "data/users.json".to_string(),
            password_iterations: 100_000,
            cookie_name: "gatehouse.sid".to_string(),
            session_ttl_secs: 24 * 60 * 60,
            anonymous_session_ttl_secs: 15 * 60,
            session_sweep_secs: 60,
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        // Container layout first, then the working directory
        let config_paths = ["gatehouse/config", "config"];

        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("port", defaults.port as i64)?
            .set_default("users_file", defaults.users_file)?
            .set_default("password_iterations", defaults.password_iterations as i64)?
            .set_default("cookie_name", defaults.cookie_name)?
            .set_default("session_ttl_secs", defaults.session_ttl_secs as i64)?
            .set_default(
                "anonymous_session_ttl_secs",
                defaults.anonymous_session_ttl_secs as i64,
            )?
            .set_default("session_sweep_secs", defaults.session_sweep_secs as i64)?;

        for config_path in config_paths {
            builder = builder.add_source(File::with_name(config_path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("GATEHOUSE").separator("__"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.users_file.trim().is_empty() {
            return Err(ConfigError::Message("users_file cannot be empty".into()));
        }

        if self.password_iterations == 0 {
            return Err(ConfigError::Message(
                "password_iterations must be greater than 0".into(),
            ));
        }

        if self.cookie_name.is_empty()
            || !self
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(ConfigError::Message(format!(
                "cookie_name {:?} must be non-empty and contain only [A-Za-z0-9._-]",
                self.cookie_name
            )));
        }

        if self.session_ttl_secs == 0 {
            return Err(ConfigError::Message(
                "session_ttl_secs must be greater than 0".into(),
            ));
        }

        if self.anonymous_session_ttl_secs == 0 {
            return Err(ConfigError::Message(
                "anonymous_session_ttl_secs must be greater than 0".into(),
            ));
        }

        if self.session_sweep_secs == 0 {
            return Err(ConfigError::Message(
                "session_sweep_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Bind address and port as a socket address string
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn users_file_path(&self) -> PathBuf {
        PathBuf::from(&self.users_file)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn anonymous_session_ttl(&self) -> Duration {
        Duration::from_secs(self.anonymous_session_ttl_secs)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_secs)
    }
}
