//! Strategy engine — leg probability estimation, combo enumeration and
//! ranking.
//!
//! `probability` and `combos` are pure; this module wires them into a
//! single request → report pass used by the binary and the HTTP API.

pub mod combos;
pub mod probability;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::types::{Combo, Leg};
use combos::generate_combos;

/// Combo sizes generated when none are configured.
pub const DEFAULT_SIZES: [usize; 2] = [3, 4];
/// Default stake in currency units.
pub const DEFAULT_STAKE: f64 = 5.0;
/// Default number of ranked combos kept.
pub const DEFAULT_TOP_N: usize = 20;
/// Largest accepted top-N.
pub const MAX_TOP_N: usize = 5000;
/// Default lower bound of the accepted odds range (inclusive).
pub const DEFAULT_MIN_ODDS: f64 = 1.01;
/// Default upper bound of the accepted odds range (inclusive).
pub const DEFAULT_MAX_ODDS: f64 = 10.0;

// ---------------------------------------------------------------------------
// Request / report
// ---------------------------------------------------------------------------

/// Parameters of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboRequest {
    #[serde(default = "default_sizes")]
    pub sizes: Vec<usize>,
    #[serde(default = "default_stake")]
    pub stake: f64,
    /// Keep only the best N combos (None = keep all).
    #[serde(default)]
    pub top_n: Option<usize>,
    /// Legs below this confidence are left out.
    #[serde(default)]
    pub min_confidence: f64,
    /// Legs priced outside `[min_odds, max_odds]` are left out.
    #[serde(default = "default_min_odds")]
    pub min_odds: f64,
    #[serde(default = "default_max_odds")]
    pub max_odds: f64,
}

fn default_sizes() -> Vec<usize> {
    DEFAULT_SIZES.to_vec()
}

fn default_stake() -> f64 {
    DEFAULT_STAKE
}

fn default_min_odds() -> f64 {
    DEFAULT_MIN_ODDS
}

fn default_max_odds() -> f64 {
    DEFAULT_MAX_ODDS
}

impl Default for ComboRequest {
    fn default() -> Self {
        Self {
            sizes: default_sizes(),
            stake: DEFAULT_STAKE,
            top_n: Some(DEFAULT_TOP_N),
            min_confidence: 0.0,
            min_odds: DEFAULT_MIN_ODDS,
            max_odds: DEFAULT_MAX_ODDS,
        }
    }
}

/// Rejected request parameters.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("stake must be positive, got {0}")]
    NonPositiveStake(f64),

    #[error("min_confidence must be within [0, 1], got {0}")]
    ConfidenceOutOfRange(f64),

    #[error("combo size must be at least 1")]
    ZeroSize,

    #[error("invalid odds range [{min}, {max}]")]
    InvalidOddsRange { min: f64, max: f64 },
}

impl ComboRequest {
    /// Check the parameters a caller can get wrong.
    ///
    /// An empty size list is allowed; it produces an empty report.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.stake.is_nan() || self.stake <= 0.0 {
            return Err(RequestError::NonPositiveStake(self.stake));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(RequestError::ConfidenceOutOfRange(self.min_confidence));
        }
        if self.sizes.contains(&0) {
            return Err(RequestError::ZeroSize);
        }
        let (min, max) = (self.min_odds, self.max_odds);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(RequestError::InvalidOddsRange { min, max });
        }
        Ok(())
    }

    /// Effective top-N, clamped to [1, MAX_TOP_N].
    pub fn effective_top_n(&self) -> Option<usize> {
        self.top_n.map(|n| n.clamp(1, MAX_TOP_N))
    }
}

/// Ranked output of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboReport {
    /// Legs left after the odds-range and confidence filter.
    pub legs_considered: usize,
    /// Combos generated before top-N truncation.
    pub total_combos: usize,
    /// Ranked (and possibly truncated) combos.
    pub combos: Vec<Combo>,
    pub generated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Keep legs priced within `[min_odds, max_odds]` whose confidence
/// reaches `min_confidence`, in input order.
pub fn filter_legs(legs: &[Leg], request: &ComboRequest) -> Vec<Leg> {
    legs.iter()
        .filter(|leg| (request.min_odds..=request.max_odds).contains(&leg.odds))
        .filter(|leg| leg.confidence >= request.min_confidence)
        .cloned()
        .collect()
}

/// Sort combos by descending combined probability.
///
/// The sort is stable: equal probabilities keep generation order.
pub fn rank_combos(combos: &mut [Combo]) {
    combos.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Run filter → generate → rank → top-N for one request.
pub fn plan(legs: &[Leg], request: &ComboRequest) -> ComboReport {
    let generated_at = Utc::now();

    let eligible = filter_legs(legs, request);
    debug!(
        legs_in = legs.len(),
        legs_kept = eligible.len(),
        min_odds = request.min_odds,
        max_odds = request.max_odds,
        min_confidence = request.min_confidence,
        "Leg filter applied"
    );

    if request.sizes.is_empty() {
        warn!("No combo sizes selected, nothing to generate");
        return ComboReport {
            legs_considered: eligible.len(),
            total_combos: 0,
            combos: Vec::new(),
            generated_at,
        };
    }

    let mut combos = generate_combos(&eligible, &request.sizes, request.stake);
    let total_combos = combos.len();
    rank_combos(&mut combos);

    if let Some(n) = request.effective_top_n() {
        combos.truncate(n);
    }

    info!(
        legs = eligible.len(),
        sizes = ?request.sizes,
        total = total_combos,
        returned = combos.len(),
        best = combos.first().map(|c| format!("{:.3}%", c.probability_pct)).unwrap_or_default(),
        "Combo generation complete"
    );

    ComboReport {
        legs_considered: eligible.len(),
        total_combos,
        combos,
        generated_at,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
