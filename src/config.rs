use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main client configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Base URL of the Hestia backend, without a trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Search composer configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Request timeout in milliseconds; unset leaves the transport default in place
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Configuration for the search composer
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Quiescence window for free-text search in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Number of recipes requested per search
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Drop responses that arrive after a newer search was issued
    #[serde(default = "default_discard_stale_responses")]
    pub discard_stale_responses: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            page_size: default_page_size(),
            discard_stale_responses: default_discard_stale_responses(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            search: SearchConfig::default(),
            timeout_ms: None,
        }
    }
}

// Default value functions
fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_page_size() -> u32 {
    20
}

fn default_discard_stale_responses() -> bool {
    true
}

impl ClientConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with HESTIA__ prefix
    /// 2. hestia.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: HESTIA__SEARCH__DEBOUNCE_MS
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Request timeout, if one was configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Load configuration from file and environment variables
///
/// See [`ClientConfig::load`] for the source priority.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("hestia").required(false))
        // Use double underscore for nested: HESTIA__SEARCH__PAGE_SIZE
        .add_source(
            Environment::with_prefix("HESTIA")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config: ClientConfig = settings.try_deserialize()?;
    config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(default_api_base_url(), "http://localhost:8000");
        assert_eq!(default_debounce_ms(), 500);
        assert_eq!(default_page_size(), 20);
        assert!(default_discard_stale_responses());
    }

    #[test]
    fn test_search_config_default() {
        let search = SearchConfig::default();
        assert_eq!(search.debounce(), Duration::from_millis(500));
        assert_eq!(search.page_size, 20);
        assert!(search.discard_stale_responses);
    }

    #[test]
    fn test_client_config_has_no_timeout_by_default() {
        let config = ClientConfig::default();
        assert!(config.timeout().is_none());
        assert_eq!(config.api_base_url, "http://localhost:8000");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings = Config::builder()
            .add_source(File::from_str(
                "api_base_url = \"https://hestia.example\"\n[search]\npage_size = 5\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: ClientConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.api_base_url, "https://hestia.example");
        assert_eq!(config.search.page_size, 5);
        assert_eq!(config.search.debounce_ms, 500);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_timeout_is_read_in_milliseconds() {
        let settings = Config::builder()
            .add_source(File::from_str("timeout_ms = 1500\n", config::FileFormat::Toml))
            .build()
            .unwrap();

        let config: ClientConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_load_config_without_file() {
        // Clear any environment variables that might interfere
        let keys_to_clear: Vec<String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("HESTIA__"))
            .map(|(k, _)| k)
            .collect();

        for key in keys_to_clear {
            std::env::remove_var(&key);
        }

        // Every key has a default, so no file is required
        let config = load_config().unwrap();
        assert_eq!(config.search.page_size, 20);
    }
}
