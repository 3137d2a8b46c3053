//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (API keys, bot tokens) are referenced by env-var name in the
//! config and resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub analyzer: AnalyzerSettings,
    pub coinmarketcap: CoinMarketCapConfig,
    pub telegram: TelegramConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    pub name: String,
    pub scan_interval_secs: u64,
    /// How many opportunities to keep per batch side.
    pub top_n: usize,
}

/// Quality-filter thresholds, mirrored into
/// [`crate::analyzer::AnalyzerConfig`] at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyzerSettings {
    pub min_market_cap: f64,
    pub min_volume_24h: f64,
    pub min_volume_to_mcap_ratio: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CoinMarketCapConfig {
    pub enabled: bool,
    pub api_key_env: String,
    /// Instruments requested per batch side, before filtering.
    pub fetch_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub enabled: bool,
    pub bot_token_env: Option<String>,
    pub chat_id_env: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub enabled: bool,
    /// History file path; the storage default is used when unset.
    #[serde(default)]
    pub history_file: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}

impl From<&AnalyzerSettings> for crate::analyzer::AnalyzerConfig {
    fn from(settings: &AnalyzerSettings) -> Self {
        crate::analyzer::AnalyzerConfig {
            min_market_cap: settings.min_market_cap,
            min_volume_24h: settings.min_volume_24h,
            min_volume_to_mcap_ratio: settings.min_volume_to_mcap_ratio,
        }
    }
}
