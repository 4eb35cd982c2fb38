//! Server configuration.
//!
//! Values come from an optional TOML file; anything the file leaves unset
//! falls back to `CG_*` environment variables. The environment is only read
//! here, at the process entry point. Library crates receive explicit config.

use cg_client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};

/// Server-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
    /// Log level, used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Largest webhook body accepted.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Bot settings as written in the config file. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotFileConfig {
    /// Bot API token.
    pub token: Option<String>,
    /// Bot API base URL.
    pub base_url: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Shared webhook secret.
    pub webhook_secret: Option<String>,
}

/// Raw config file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Partial server settings.
    #[serde(default)]
    pub server: Option<toml::Value>,
    /// Bot settings.
    #[serde(default)]
    pub bot: BotFileConfig,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server settings.
    pub server: ServerConfig,
    /// Outbound client settings.
    pub client: ClientConfig,
    /// Shared webhook secret.
    pub webhook_secret: String,
}

/// Loads configuration from an optional TOML file plus the process environment.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let file = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?
        }
        None => FileConfig::default(),
    };

    resolve_config(file, |key| std::env::var(key).ok())
}

/// Merges file values with environment fallbacks.
pub fn resolve_config<F>(file: FileConfig, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Env only fills in what the file did not set explicitly
    let file_keys: Vec<String> = file
        .server
        .as_ref()
        .and_then(toml::Value::as_table)
        .map(|table| table.keys().cloned().collect())
        .unwrap_or_default();
    let from_env = |key: &str, var: &str| {
        if file_keys.iter().any(|k| k == key) {
            None
        } else {
            env(var)
        }
    };

    let mut server: ServerConfig = file
        .server
        .map(toml::Value::try_into)
        .transpose()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?
        .unwrap_or_default();

    if let Some(host) = from_env("host", "CG_HOST") {
        server.host = host;
    }
    if let Some(port) = from_env("port", "CG_PORT") {
        server.port = parse_env("CG_PORT", &port)?;
    }
    if let Some(level) = from_env("log_level", "CG_LOG_LEVEL") {
        server.log_level = level;
    }

    let bot = file.bot;
    let token = bot
        .token
        .or_else(|| env("CG_BOT_TOKEN"))
        .filter(|t| !t.is_empty())
        .ok_or(ConfigError::Missing("bot.token / CG_BOT_TOKEN"))?;
    let webhook_secret = bot
        .webhook_secret
        .or_else(|| env("CG_WEBHOOK_SECRET"))
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing("bot.webhook_secret / CG_WEBHOOK_SECRET"))?;
    let base_url = bot
        .base_url
        .or_else(|| env("CG_BASE_URL"))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let timeout_ms = match bot.timeout_ms {
        Some(ms) => ms,
        None => match env("CG_TIMEOUT_MS") {
            Some(raw) => parse_env("CG_TIMEOUT_MS", &raw)?,
            None => DEFAULT_TIMEOUT_MS,
        },
    };

    Ok(AppConfig {
        server,
        client: ClientConfig::new(token).base_url(base_url).timeout_ms(timeout_ms),
        webhook_secret,
    })
}

fn parse_env<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(key, raw.to_string()))
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let server = ServerConfig::default();
        assert_eq!(server.port, 8000);
        assert_eq!(server.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn test_env_only() {
        let config = resolve_config(
            FileConfig::default(),
            env_from(&[
                ("CG_BOT_TOKEN", "env-token"),
                ("CG_WEBHOOK_SECRET", "env-secret"),
                ("CG_TIMEOUT_MS", "2500"),
                ("CG_PORT", "9100"),
            ]),
        )
        .unwrap();

        assert_eq!(config.client.token, "env-token");
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.client.timeout_ms, 2500);
        assert_eq!(config.webhook_secret, "env-secret");
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_file_wins_over_env() {
        let file: FileConfig = toml::from_str(
            r#"
            [server]
            port = 7000

            [bot]
            token = "file-token"
            webhook_secret = "file-secret"
            base_url = "http://localhost:4000"
            "#,
        )
        .unwrap();

        let config = resolve_config(
            file,
            env_from(&[
                ("CG_BOT_TOKEN", "env-token"),
                ("CG_PORT", "9100"),
                ("CG_HOST", "127.0.0.1"),
            ]),
        )
        .unwrap();

        assert_eq!(config.client.token, "file-token");
        assert_eq!(config.client.base_url, "http://localhost:4000");
        assert_eq!(config.client.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.server.port, 7000);
        // Not set in the file, so the environment applies
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_missing_secret() {
        let err = resolve_config(FileConfig::default(), env_from(&[("CG_BOT_TOKEN", "t")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_invalid_env_number() {
        let err = resolve_config(
            FileConfig::default(),
            env_from(&[
                ("CG_BOT_TOKEN", "t"),
                ("CG_WEBHOOK_SECRET", "s"),
                ("CG_TIMEOUT_MS", "soon"),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("CG_TIMEOUT_MS", _)));
    }
}
