//! Configuration handling.
//!
//! Settings are layered: built-in defaults, then an optional
//! `.festivalradar.toml` file, then environment variables (including a
//! `.env` file), then CLI flags. Configuration is loaded once in `main` and
//! passed down explicitly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".festivalradar.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Ticketmaster Discovery API settings.
    #[serde(default)]
    pub ticketmaster: TicketmasterConfig,

    /// Eventbrite API settings.
    #[serde(default)]
    pub eventbrite: EventbriteConfig,

    /// Aggregation behaviour.
    #[serde(default)]
    pub search: SearchConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Ticketmaster Discovery API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketmasterConfig {
    /// API key. Absence only surfaces when a search runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API root, without the `/discovery/v2` path.
    #[serde(default = "default_ticketmaster_url")]
    pub base_url: String,

    /// Fixed country filter.
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Events requested per call (first page only).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for TicketmasterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_ticketmaster_url(),
            country_code: default_country_code(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_ticketmaster_url() -> String {
    "https://app.ticketmaster.com".to_string()
}

fn default_country_code() -> String {
    "CA".to_string()
}

/// Eventbrite API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventbriteConfig {
    /// Bearer token. When unset the provider is skipped entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API root, without the `/v3` path.
    #[serde(default = "default_eventbrite_url")]
    pub base_url: String,

    /// Events requested per call (first page only).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for EventbriteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_eventbrite_url(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_eventbrite_url() -> String {
    "https://www.eventbriteapi.com".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_timeout() -> u64 {
    10
}

/// Aggregation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Report a timed-out provider as a failure instead of dropping it.
    #[serde(default)]
    pub surface_timeouts: bool,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Overlay environment variables on top of this configuration.
    ///
    /// `lookup` abstracts `std::env::var` so tests don't touch the process
    /// environment.
    pub fn merge_with_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("TICKETMASTER_API_KEY") {
            self.ticketmaster.api_key = Some(key);
        }
        if let Some(key) = non_empty("EVENTBRITE_API_KEY") {
            self.eventbrite.api_key = Some(key);
        }
        if let Some(port) = non_empty("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }

        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence; only explicitly provided values override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref host) = args.host {
            self.server.host = host.clone();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(timeout) = args.timeout {
            self.ticketmaster.timeout_seconds = timeout;
            self.eventbrite.timeout_seconds = timeout;
        }
        if args.surface_timeouts {
            self.search.surface_timeouts = true;
        }
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.ticketmaster.country_code, "CA");
        assert_eq!(config.ticketmaster.page_size, 10);
        assert_eq!(config.eventbrite.page_size, 10);
        assert_eq!(config.ticketmaster.timeout_seconds, 10);
        assert!(config.ticketmaster.api_key.is_none());
        assert!(!config.search.surface_timeouts);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[server]
port = 9100

[ticketmaster]
api_key = "tm-key"
country_code = "US"

[search]
surface_timeouts = true
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.ticketmaster.api_key.as_deref(), Some("tm-key"));
        assert_eq!(config.ticketmaster.country_code, "US");
        assert_eq!(config.ticketmaster.base_url, "https://app.ticketmaster.com");
        assert!(config.eventbrite.api_key.is_none());
        assert!(config.search.surface_timeouts);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[eventbrite]\napi_key = \"eb\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.eventbrite.api_key.as_deref(), Some("eb"));
        assert!(Config::load(&temp_dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .merge_with_env(env(&[
                ("TICKETMASTER_API_KEY", "tm"),
                ("EVENTBRITE_API_KEY", ""),
                ("PORT", "8123"),
            ]))
            .unwrap();

        assert_eq!(config.ticketmaster.api_key.as_deref(), Some("tm"));
        assert!(config.eventbrite.api_key.is_none());
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.bind_address(), "0.0.0.0:8123");
    }

    #[test]
    fn test_invalid_port_env() {
        let mut config = Config::default();
        assert!(config.merge_with_env(env(&[("PORT", "eighty")])).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[ticketmaster]"));
        assert!(toml_str.contains("[eventbrite]"));
        assert!(!toml_str.contains("api_key"));
    }
}
