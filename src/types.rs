//! Shared types for the PARLAY generator.
//!
//! `Leg` is the input unit supplied by a leg source or the user;
//! `Combo` is the derived, ephemeral record produced by the generator.
//! Both are plain data so the strategy, export and dashboard modules
//! can depend on them without circular references.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::strategy::probability;

/// Confidence assigned to legs that arrive without a user estimate.
pub use crate::strategy::probability::NEUTRAL_CONFIDENCE;

// ---------------------------------------------------------------------------
// Leg
// ---------------------------------------------------------------------------

/// One candidate wager considered for inclusion in a combo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Event label, e.g. "Arsenal vs Chelsea".
    pub event: String,
    /// Market / outcome label, e.g. "Over 2.5".
    pub market: String,
    /// Decimal odds (> 1.0 for a real bet).
    pub odds: f64,
    /// User belief strength (0.0–1.0).
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Manual probability override (0.0 = unset).
    #[serde(default)]
    pub manual_prob: f64,
}

fn default_confidence() -> f64 {
    NEUTRAL_CONFIDENCE
}

impl Leg {
    pub fn new(event: impl Into<String>, market: impl Into<String>, odds: f64) -> Self {
        Self {
            event: event.into(),
            market: market.into(),
            odds,
            confidence: NEUTRAL_CONFIDENCE,
            manual_prob: 0.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_manual_prob(mut self, manual_prob: f64) -> Self {
        self.manual_prob = manual_prob;
        self
    }

    /// Bookmaker-implied probability (1 / odds, or 0 for invalid odds).
    pub fn implied_probability(&self) -> f64 {
        probability::implied_probability(self.odds)
    }

    /// Final per-leg estimate blending market, confidence and manual input.
    pub fn estimated_probability(&self) -> f64 {
        probability::estimate_probability(self.odds, self.confidence, self.manual_prob)
    }

    /// Label used in combo descriptions.
    pub fn label(&self) -> String {
        format!("{} — {}", self.event, self.market)
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {:.2} (conf={:.0}%",
            self.label(),
            self.odds,
            self.confidence * 100.0,
        )?;
        if self.manual_prob > 0.0 {
            write!(f, " manual={:.1}%", self.manual_prob * 100.0)?;
        }
        write!(f, ")")
    }
}

// ---------------------------------------------------------------------------
// Combo
// ---------------------------------------------------------------------------

/// A selection of k distinct legs with its derived figures.
///
/// Combos carry no identity; they are rebuilt on every generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    /// Member labels joined with `" | "`, in input order.
    pub legs: String,
    /// Number of legs (k).
    pub size: usize,
    /// Combined probability in percent, rounded to 3 dp.
    pub probability_pct: f64,
    /// Product of raw leg odds, rounded to 3 dp.
    pub combined_odds: f64,
    /// `combined_odds * stake`, rounded to 2 dp.
    pub potential_payout: f64,
    /// Unrounded combined probability used for ranking.
    ///
    /// Product of per-leg estimates, i.e. it assumes the legs are
    /// independent. Correlated legs (same match, related markets) are
    /// not accounted for.
    pub probability: f64,
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] P={:.3}% odds={:.3} payout={:.2} | {}",
            self.size, self.probability_pct, self.combined_odds, self.potential_payout, self.legs,
        )
    }
}

impl Combo {
    /// Expected return of the stake under the combo's own probability.
    pub fn expected_return(&self) -> f64 {
        self.probability * self.potential_payout
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
