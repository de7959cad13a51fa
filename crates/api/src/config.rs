//! Application configuration loaded from environment variables.

use saga::TEST_SOURCE_ACCEPT;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `STATESTORE_NAME`: state store the inventory keys live in
/// - `CATALOG`: comma-separated item catalog
/// - `NOTIFICATIONS_TOPIC`: pub/sub topic for fulfillment events
/// - `PAYMENT_SOURCE_TOKEN`: payment source credential; defaults to
///   the simulated gateway's accept token, real deployments override
/// - `PAYMENT_CURRENCY`: currency code for all charges
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub statestore_name: String,
    pub catalog: Vec<String>,
    pub topic: String,
    pub payment_source_token: String,
    pub payment_currency: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            statestore_name: std::env::var("STATESTORE_NAME")
                .unwrap_or_else(|_| "statestore".to_string()),
            catalog: std::env::var("CATALOG")
                .map(|s| parse_catalog(&s))
                .unwrap_or_else(|_| default_catalog()),
            topic: std::env::var("NOTIFICATIONS_TOPIC")
                .unwrap_or_else(|_| saga::NOTIFICATIONS_TOPIC.to_string()),
            payment_source_token: std::env::var("PAYMENT_SOURCE_TOKEN")
                .unwrap_or_else(|_| TEST_SOURCE_ACCEPT.to_string()),
            payment_currency: std::env::var("PAYMENT_CURRENCY")
                .unwrap_or_else(|_| "USD".to_string()),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            statestore_name: "statestore".to_string(),
            catalog: default_catalog(),
            topic: saga::NOTIFICATIONS_TOPIC.to_string(),
            payment_source_token: TEST_SOURCE_ACCEPT.to_string(),
            payment_currency: "USD".to_string(),
        }
    }
}

fn default_catalog() -> Vec<String> {
    saga::DEFAULT_CATALOG.iter().map(|s| s.to_string()).collect()
}

fn parse_catalog(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
