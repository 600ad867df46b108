// Loading configuration
// Uses the 'config' crate layered over an optional .env file

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_address: String,
    // Remote catalog, queried as {catalog_base_url}/cars and /cars/{id}
    pub catalog_base_url: String,
    pub request_timeout_ms: u64,
    // Artificial latency applied when serving local sample data
    pub list_fallback_delay_ms: u64,
    pub detail_fallback_delay_ms: u64,
    pub favorites_path: String,
    pub proxy_url: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Config::builder()
            // Add default values
            .set_default("server_address", "127.0.0.1:3000")?
            .set_default("catalog_base_url", "https://apicars.prisms.in")?
            .set_default("request_timeout_ms", 5000)?
            .set_default("list_fallback_delay_ms", 800)?
            .set_default("detail_fallback_delay_ms", 500)?
            .set_default("favorites_path", "car_favorites.json")?
            // Load from a configuration file (e.g., config.toml)
            .add_source(File::with_name("config").required(false))
            // Load from environment variables (e.g., APP_CATALOG_BASE_URL)
            .add_source(Environment::with_prefix("APP").prefix_separator("_").separator("__"));

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn list_fallback_delay(&self) -> Duration {
        Duration::from_millis(self.list_fallback_delay_ms)
    }

    pub fn detail_fallback_delay(&self) -> Duration {
        Duration::from_millis(self.detail_fallback_delay_ms)
    }
}

#[cfg(test)]
impl Settings {
    // Fixed settings for tests; never reads the environment.
    pub fn for_tests(catalog_base_url: &str) -> Self {
        Settings {
            server_address: "127.0.0.1:0".to_string(),
            catalog_base_url: catalog_base_url.to_string(),
            request_timeout_ms: 5000,
            list_fallback_delay_ms: 800,
            detail_fallback_delay_ms: 500,
            favorites_path: "car_favorites.json".to_string(),
            proxy_url: None,
        }
    }
}
