use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Seconds between scrape runs
    #[serde(default = "default_scrape_interval_secs")]
    pub scrape_interval_secs: u64,
    /// Deadline in seconds for each render and each model call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Optional external render service for JS-heavy sites.
    /// When unset, pages are fetched directly and stripped to body text.
    #[serde(default)]
    pub renderer_url: Option<String>,
    /// Model provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Configuration for the extraction model provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Model identifier (e.g., "gpt-4o-mini")
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for authentication (can also be set via OPENAI_API_KEY)
    pub api_key: Option<String>,
    /// Base URL for the API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

// Default value functions
fn default_scrape_interval_secs() -> u64 {
    // twice a day
    12 * 60 * 60
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_database_path() -> String {
    "masjid_times.db".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MASJID__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MASJID__PROVIDER__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            // Use double underscore for nested: MASJID__PROVIDER__MODEL
            .add_source(
                Environment::with_prefix("MASJID")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
