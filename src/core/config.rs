use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.frankfurter.app";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the client entry page and its assets.
    pub static_dir: String,
    /// Origins allowed by CORS. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            static_dir: "public".to_string(),
            cors_origins: vec![
                "http://localhost:5500".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UpstreamProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for UpstreamProviderConfig {
    fn default() -> Self {
        UpstreamProviderConfig {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UpstreamProviderConfig {
    /// The configured credential, ignoring blank values.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub upstream: Option<UpstreamProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            upstream: Some(UpstreamProviderConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    pub amplitude: f64,
    pub jitter: f64,
    /// Fixed seed for reproducible trend output.
    pub seed: Option<u64>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            amplitude: 0.05,
            jitter: 0.01,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: format!("http://localhost:{DEFAULT_PORT}"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl AppConfig {
    /// Loads the config from `path`, or the default location when present, then
    /// applies environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => {
                let default_path = Self::default_config_path()?;
                if default_path.exists() {
                    Self::load_from_path(&default_path)?
                } else {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxview", "fxview")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Overrides file settings with values from `lookup` (the process environment
    /// in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FX_API_URL") {
            self.providers
                .upstream
                .get_or_insert_with(UpstreamProviderConfig::default)
                .base_url = url;
        }
        if let Some(key) = lookup("FX_API_KEY") {
            self.providers
                .upstream
                .get_or_insert_with(UpstreamProviderConfig::default)
                .api_key = Some(key);
        }
        if let Some(port) = lookup("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(%port, "Ignoring invalid PORT value"),
            }
        }
        if let Some(dir) = lookup("FX_STATIC_DIR") {
            self.server.static_dir = dir;
        }
        if let Some(seed) = lookup("FX_HISTORY_SEED") {
            match seed.trim().parse() {
                Ok(seed) => self.history.seed = Some(seed),
                Err(_) => tracing::warn!(%seed, "Ignoring invalid FX_HISTORY_SEED value"),
            }
        }
        if let Some(url) = lookup("FX_SERVER_URL") {
            self.client.server_url = url;
        }
    }

    /// Upstream settings when a credential is configured; `None` means fallback-only.
    pub fn live_upstream(&self) -> Option<&UpstreamProviderConfig> {
        self.providers
            .upstream
            .as_ref()
            .filter(|upstream| upstream.credential().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
server:
  port: 8080
  static_dir: "/srv/fxview"
providers:
  upstream:
    base_url: "http://example.com/rates"
    api_key: "secret"
history:
  seed: 42
client:
  server_url: "http://example.com:8080"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.static_dir, "/srv/fxview");
        let upstream = config.providers.upstream.as_ref().unwrap();
        assert_eq!(upstream.base_url, "http://example.com/rates");
        assert_eq!(upstream.credential(), Some("secret"));
        assert_eq!(upstream.timeout_secs, 10);
        assert_eq!(config.history.seed, Some(42));
        assert_eq!(config.history.amplitude, 0.05);
        assert_eq!(config.client.server_url, "http://example.com:8080");
        assert!(config.live_upstream().is_some());
    }

    #[test]
    fn test_defaults_are_fallback_only() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 3000);
        assert_eq!(
            config.providers.upstream.as_ref().unwrap().base_url,
            DEFAULT_UPSTREAM_URL
        );
        assert!(config.live_upstream().is_none());
    }

    #[test]
    fn test_blank_api_key_is_not_a_credential() {
        let yaml_str = r#"
providers:
  upstream:
    base_url: "http://example.com"
    api_key: "   "
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert!(config.live_upstream().is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = [
            ("FX_API_URL", "http://localhost:9999"),
            ("FX_API_KEY", "abc123"),
            ("PORT", "4000"),
            ("FX_HISTORY_SEED", "7"),
            ("FX_SERVER_URL", "http://localhost:4000"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig {
            providers: ProvidersConfig { upstream: None },
            ..AppConfig::default()
        };
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        let upstream = config.live_upstream().expect("upstream configured");
        assert_eq!(upstream.base_url, "http://localhost:9999");
        assert_eq!(upstream.credential(), Some("abc123"));
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.history.seed, Some(7));
        assert_eq!(config.client.server_url, "http://localhost:4000");
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/definitely/not/here.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
