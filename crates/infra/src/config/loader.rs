//! Configuration loader
//!
//! Loads service configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `FANEVENT_JWT_SECRET` is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `FANEVENT_JWT_SECRET`: HS256 secret for bearer tokens (required)
//! - `FANEVENT_JWT_ISSUER` / `FANEVENT_JWT_AUDIENCE`: optional claim checks
//! - `FANEVENT_SERVER_HOST` / `FANEVENT_SERVER_PORT`: listener address
//! - `FANEVENT_CORS_ORIGINS`: comma-separated allowed origins
//! - `FANEVENT_DB_PATH` / `FANEVENT_DB_POOL_SIZE`: SQLite settings
//! - `FANEVENT_REMINDERS_ENABLED`: whether the reminder sweep runs
//! - `FANEVENT_REMINDER_CRON`: six-field cron expression for the sweep
//! - `FANEVENT_REMINDER_LOOKAHEAD_MINUTES`: sweep window
//!
//! Optional variables fall back to the defaults in
//! [`fanevent_domain::Config`].
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `fanevent.{json,toml}` in the
//! working directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use fanevent_domain::{Config, FanEventError, Result};

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `FanEventError::Config` if configuration cannot be loaded from
/// either source or a value is malformed.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `FANEVENT_JWT_SECRET` is required; everything else defaults.
///
/// # Errors
/// Returns `FanEventError::Config` if the secret is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.auth.jwt_secret = env_var("FANEVENT_JWT_SECRET")?;
    config.auth.issuer = std::env::var("FANEVENT_JWT_ISSUER").ok();
    config.auth.audience = std::env::var("FANEVENT_JWT_AUDIENCE").ok();

    if let Ok(host) = std::env::var("FANEVENT_SERVER_HOST") {
        config.server.host = host;
    }
    if let Some(port) = env_parse::<u16>("FANEVENT_SERVER_PORT", "port")? {
        config.server.port = port;
    }
    if let Ok(origins) = std::env::var("FANEVENT_CORS_ORIGINS") {
        config.server.cors_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Ok(path) = std::env::var("FANEVENT_DB_PATH") {
        config.database.path = path;
    }
    if let Some(pool_size) = env_parse::<u32>("FANEVENT_DB_POOL_SIZE", "pool size")? {
        config.database.pool_size = pool_size;
    }

    config.reminders.enabled = env_bool("FANEVENT_REMINDERS_ENABLED", config.reminders.enabled);
    if let Ok(cron) = std::env::var("FANEVENT_REMINDER_CRON") {
        config.reminders.cron_expression = cron;
    }
    if let Some(lookahead) =
        env_parse::<i64>("FANEVENT_REMINDER_LOOKAHEAD_MINUTES", "reminder lookahead")?
    {
        config.reminders.lookahead_minutes = lookahead;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`]. Format is picked by file extension.
///
/// # Errors
/// Returns `FanEventError::Config` if the file is missing, unreadable, or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FanEventError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FanEventError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FanEventError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FanEventError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FanEventError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(FanEventError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["config.json", "config.toml", "fanevent.json", "fanevent.toml"];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| [root.clone(), root.join(".."), root.join("../..")])
        .flat_map(|dir| NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        FanEventError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional variable; `Ok(None)` when unset.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| FanEventError::Config(format!("Invalid {}: {}", what, e))),
        Err(_) => Ok(None),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 11] = [
        "FANEVENT_JWT_SECRET",
        "FANEVENT_JWT_ISSUER",
        "FANEVENT_JWT_AUDIENCE",
        "FANEVENT_SERVER_HOST",
        "FANEVENT_SERVER_PORT",
        "FANEVENT_CORS_ORIGINS",
        "FANEVENT_DB_PATH",
        "FANEVENT_DB_POOL_SIZE",
        "FANEVENT_REMINDERS_ENABLED",
        "FANEVENT_REMINDER_CRON",
        "FANEVENT_REMINDER_LOOKAHEAD_MINUTES",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("FANEVENT_TEST_BOOL_YES", "YES");
        std::env::set_var("FANEVENT_TEST_BOOL_OFF", "off");
        std::env::remove_var("FANEVENT_TEST_BOOL_MISSING");

        assert!(env_bool("FANEVENT_TEST_BOOL_YES", false));
        assert!(!env_bool("FANEVENT_TEST_BOOL_OFF", true));
        assert!(env_bool("FANEVENT_TEST_BOOL_MISSING", true));
        assert!(!env_bool("FANEVENT_TEST_BOOL_MISSING", false));

        std::env::remove_var("FANEVENT_TEST_BOOL_YES");
        std::env::remove_var("FANEVENT_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("FANEVENT_JWT_SECRET", "s3cret");
        std::env::set_var("FANEVENT_JWT_ISSUER", "https://id.example.com");
        std::env::set_var("FANEVENT_SERVER_PORT", "9090");
        std::env::set_var("FANEVENT_CORS_ORIGINS", "https://a.example, https://b.example,");
        std::env::set_var("FANEVENT_DB_PATH", "/tmp/fanevent-test.db");
        std::env::set_var("FANEVENT_DB_POOL_SIZE", "3");
        std::env::set_var("FANEVENT_REMINDERS_ENABLED", "false");
        std::env::set_var("FANEVENT_REMINDER_LOOKAHEAD_MINUTES", "120");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config loads from env");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.issuer.as_deref(), Some("https://id.example.com"));
        assert_eq!(config.auth.audience, None);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.server.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.database.path, "/tmp/fanevent-test.db");
        assert_eq!(config.database.pool_size, 3);
        assert!(!config.reminders.enabled);
        assert_eq!(config.reminders.lookahead_minutes, 120);
    }

    #[test]
    fn test_load_from_env_missing_secret() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, FanEventError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("FANEVENT_JWT_SECRET", "s3cret");
        std::env::set_var("FANEVENT_DB_POOL_SIZE", "lots");

        let result = load_from_env();
        clear_env();

        match result {
            Err(FanEventError::Config(msg)) => assert!(msg.contains("pool size"), "{msg}"),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[server]
port = 3000

[auth]
jwt_secret = "file-secret"
audience = "fanevent"

[reminders]
cron_expression = "0 * * * * *"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        std::fs::remove_file(path).ok();

        let config = result.expect("config loads from TOML");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.jwt_secret, "file-secret");
        assert_eq!(config.auth.audience.as_deref(), Some("fanevent"));
        assert_eq!(config.reminders.cron_expression, "0 * * * * *");
        assert_eq!(config.database.path, "fanevent.db");
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/fanevent.json"))).unwrap_err();
        assert!(matches!(err, FanEventError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let result = parse_config(r#"{ "auth": "#, Path::new("broken.json"));
        assert!(matches!(result, Err(FanEventError::Config(_))));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("auth: {}", Path::new("fanevent.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
