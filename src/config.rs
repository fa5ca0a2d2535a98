//! Runtime configuration loaded from environment variables.
//!
//! - `DAYNOTES_DB` - Database file (default: platform data dir)
//! - `DAYNOTES_PORT` - HTTP port for `serve` (default: 3000)
//! - `DAYNOTES_API_KEY` - Bearer key required by the HTTP API (optional)
//! - `DAYNOTES_AI_URL` - Chat-completion gateway base URL
//! - `DAYNOTES_AI_KEY` - Gateway API key; the assistant is disabled without it
//! - `DAYNOTES_AI_MODEL` - Model identifier sent to the gateway
//! - `DAYNOTES_AI_TIMEOUT_SECS` - Gateway request timeout (default: 60)

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-3-flash-preview";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GATEWAY_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let timeout = get("DAYNOTES_AI_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            url: get("DAYNOTES_AI_URL").unwrap_or(defaults.url),
            api_key: get("DAYNOTES_AI_KEY").filter(|k| !k.is_empty()),
            model: get("DAYNOTES_AI_MODEL").unwrap_or(defaults.model),
            timeout,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit database path; `None` means the platform default.
    pub database_path: Option<PathBuf>,
    pub port: u16,
    pub api_key: Option<String>,
    pub gateway: GatewayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            port: DEFAULT_PORT,
            api_key: None,
            gateway: GatewayConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let port = get("DAYNOTES_PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            database_path: get("DAYNOTES_DB").map(PathBuf::from),
            port,
            api_key: get("DAYNOTES_API_KEY").filter(|k| !k.is_empty()),
            gateway: GatewayConfig::from_lookup(&get),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.database_path.is_none());
        assert!(config.api_key.is_none());
        assert_eq!(config.gateway.url, DEFAULT_GATEWAY_URL);
        assert_eq!(config.gateway.model, DEFAULT_MODEL);
        assert_eq!(config.gateway.timeout, Duration::from_secs(60));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DAYNOTES_DB", "/tmp/notes.db"),
            ("DAYNOTES_PORT", "8080"),
            ("DAYNOTES_AI_KEY", "secret"),
            ("DAYNOTES_AI_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/notes.db")));
        assert_eq!(config.port, 8080);
        assert_eq!(config.gateway.api_key.as_deref(), Some("secret"));
        assert_eq!(config.gateway.timeout, Duration::from_secs(5));
    }

    #[test]
    fn ignores_unparsable_and_empty_values() {
        let config = Config::from_lookup(lookup(&[
            ("DAYNOTES_PORT", "not-a-port"),
            ("DAYNOTES_AI_KEY", ""),
        ]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.gateway.api_key.is_none());
    }
}
