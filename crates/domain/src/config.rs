//! Service configuration structures
//!
//! Loading lives in `fanevent-infra::config`; this module only defines the
//! shape and the defaults.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_REMINDER_CRON;

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8080, cors_origins: Vec::new() }
    }
}

/// SQLite database settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "fanevent.db".into(), pool_size: 8 }
    }
}

/// Identity provider token verification settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 shared secret used to verify bearer tokens.
    pub jwt_secret: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
}

/// Reminder sweep settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReminderConfig {
    pub enabled: bool,
    /// Six-field cron expression (seconds first).
    pub cron_expression: String,
    /// How far ahead the sweep looks for events, in minutes.
    pub lookahead_minutes: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cron_expression: DEFAULT_REMINDER_CRON.into(),
            lookahead_minutes: crate::constants::REMINDER_MAX_OFFSET_MINUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_like_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"auth": {"jwt_secret": "s3cret"}}"#).expect("parses");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.pool_size, 8);
        assert!(config.reminders.enabled);
        assert_eq!(config.reminders.cron_expression, DEFAULT_REMINDER_CRON);
    }
}
