//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults, so a partial file (or none at all) is
//! valid. The Odds API key is referenced by env-var name and resolved
//! at runtime into a `SecretString`.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::strategy::{
    ComboRequest, RequestError, DEFAULT_MAX_ODDS, DEFAULT_MIN_ODDS, DEFAULT_SIZES, DEFAULT_STAKE,
    DEFAULT_TOP_N,
};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub combos: CombosConfig,
    pub sources: SourcesConfig,
    pub odds_api: OddsApiConfig,
    pub export: ExportConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CombosConfig {
    pub sizes: Vec<usize>,
    pub stake: f64,
    pub top_n: usize,
    pub min_confidence: f64,
    /// Accepted odds range, both bounds inclusive.
    pub min_odds: f64,
    pub max_odds: f64,
    /// Legs beyond this count are dropped before enumeration.
    pub max_legs: usize,
}

impl Default for CombosConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            stake: DEFAULT_STAKE,
            top_n: DEFAULT_TOP_N,
            min_confidence: 0.0,
            min_odds: DEFAULT_MIN_ODDS,
            max_odds: DEFAULT_MAX_ODDS,
            max_legs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourcesConfig {
    /// TOML or JSON file with user-entered legs.
    pub legs_file: Option<String>,
    /// Use the built-in sample slate when no other source yields legs.
    pub use_sample_slate: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            legs_file: None,
            use_sample_slate: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OddsApiConfig {
    pub enabled: bool,
    /// Sport keys, e.g. "soccer_epl". One request per sport.
    pub sports: Vec<String>,
    pub region: String,
    pub market: String,
    pub api_key_env: String,
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sports: vec!["soccer_epl".to_string()],
            region: "uk".to_string(),
            market: "h2h".to_string(),
            api_key_env: "ODDS_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    /// Where the ranked combos are written (None = no file).
    pub csv_path: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            csv_path: Some("combos.csv".to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 8080,
        }
    }
}

/// Semantically invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("[combos] {0}")]
    Combos(#[from] RequestError),

    #[error("[combos] max_legs must be at least 1")]
    ZeroMaxLegs,

    #[error("[odds_api] enabled but no sports listed")]
    NoSports,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            warn!(path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Reject values the generator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.combo_request().validate()?;
        if self.combos.max_legs == 0 {
            return Err(ConfigError::ZeroMaxLegs);
        }
        if self.odds_api.enabled && self.odds_api.sports.is_empty() {
            return Err(ConfigError::NoSports);
        }
        Ok(())
    }

    /// Generation parameters described by `[combos]`.
    pub fn combo_request(&self) -> ComboRequest {
        ComboRequest {
            sizes: self.combos.sizes.clone(),
            stake: self.combos.stake,
            top_n: Some(self.combos.top_n),
            min_confidence: self.combos.min_confidence,
            min_odds: self.combos.min_odds,
            max_odds: self.combos.max_odds,
        }
    }

    /// Resolve the Odds API key from the configured env var.
    pub fn odds_api_key(&self) -> Result<SecretString> {
        Self::resolve_env(&self.odds_api.api_key_env).map(SecretString::new)
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
