//! Leg sources.
//!
//! Defines the `LegSource` trait and the two implementations used by the
//! binary: a static slate (file or built-in sample) and The Odds API.
//! A failing source never aborts a run; it contributes zero legs.

pub mod odds_api;
pub mod slate;

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::types::Leg;
use odds_api::OddsApiClient;
use slate::StaticLegSource;

/// Failure while fetching or parsing legs from a source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Odds API error (status={status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing API key: {0}")]
    MissingKey(String),
}

/// Abstraction over anything that can supply a list of legs.
#[async_trait]
pub trait LegSource: Send + Sync {
    /// Fetch the current legs, in the order they should be combined.
    async fn fetch_legs(&self) -> Result<Vec<Leg>, SourceError>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Fetch from every source concurrently and concatenate in source order.
///
/// Failed sources are logged and skipped.
pub async fn load_legs(sources: &[Box<dyn LegSource>]) -> Vec<Leg> {
    let results = join_all(sources.iter().map(|s| s.fetch_legs())).await;

    let mut legs = Vec::new();
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(fetched) => {
                info!(source = source.name(), count = fetched.len(), "Legs loaded");
                legs.extend(fetched);
            }
            Err(e) => {
                warn!(source = source.name(), error = %e, "Leg source failed, using no legs from it");
            }
        }
    }
    legs
}

/// Build the sources enabled in the configuration, in combine order:
/// the slate file first, then one Odds API client per sport.
pub fn sources_from_config(cfg: &AppConfig) -> Vec<Box<dyn LegSource>> {
    let mut sources: Vec<Box<dyn LegSource>> = Vec::new();

    if let Some(path) = &cfg.sources.legs_file {
        sources.push(Box::new(StaticLegSource::from_file(path)));
    }

    if cfg.odds_api.enabled {
        match cfg.odds_api_key() {
            Ok(key) => {
                for sport in &cfg.odds_api.sports {
                    match OddsApiClient::new(
                        key.clone(),
                        sport.as_str(),
                        cfg.odds_api.region.as_str(),
                        cfg.odds_api.market.as_str(),
                    ) {
                        Ok(client) => sources.push(Box::new(client)),
                        Err(e) => warn!(sport = %sport, error = %e, "Failed to build Odds API client"),
                    }
                }
            }
            Err(e) => warn!(error = %e, "Odds API enabled but no key available"),
        }
    }

    sources
}

/// Load legs for one generation run.
///
/// Falls back to the sample slate when the configured sources produce
/// nothing and the fallback is enabled, then applies `max_legs`.
pub async fn collect_legs(cfg: &AppConfig) -> Vec<Leg> {
    let sources = sources_from_config(cfg);
    let mut legs = load_legs(&sources).await;

    if legs.is_empty() {
        if cfg.sources.use_sample_slate {
            info!("No legs from configured sources, using the sample slate");
            legs = StaticLegSource::sample_slate();
        } else {
            warn!("No legs available, combo list will be empty");
        }
    }

    cap_legs(legs, cfg.combos.max_legs)
}

/// Truncate to at most `max_legs`, warning when legs are dropped.
pub fn cap_legs(mut legs: Vec<Leg>, max_legs: usize) -> Vec<Leg> {
    if legs.len() > max_legs {
        warn!(
            available = legs.len(),
            max_legs,
            "Too many legs for combo enumeration, keeping the first ones"
        );
        legs.truncate(max_legs);
    }
    legs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
