//! Per-leg probability estimation.
//!
//! Turns decimal odds into a market-implied probability and blends it
//! with the user's confidence and optional manual estimate.

/// Confidence at which the market estimate is left untouched.
pub const NEUTRAL_CONFIDENCE: f64 = 0.5;

/// Full swing of the confidence modifier. With confidence in [0, 1] the
/// implied probability moves by at most ±10%.
pub const CONFIDENCE_SWING: f64 = 0.2;

/// Probability implied by decimal odds taken at face value.
///
/// Odds ≤ 0 carry no information and map to 0.
pub fn implied_probability(odds: f64) -> f64 {
    if odds <= 0.0 {
        return 0.0;
    }
    1.0 / odds
}

/// Final estimated win probability for one leg.
///
/// With a manual probability (> 0) the result linearly interpolates
/// between the manual and the implied estimate, weighted by confidence.
/// Without one, the implied probability is scaled by
/// `1 + (confidence - 0.5) * 0.2` and clamped to [0, 1].
pub fn estimate_probability(odds: f64, confidence: f64, manual_probability: f64) -> f64 {
    let implied = implied_probability(odds);

    if manual_probability > 0.0 {
        return confidence * manual_probability + (1.0 - confidence) * implied;
    }

    let modifier = 1.0 + (confidence - NEUTRAL_CONFIDENCE) * CONFIDENCE_SWING;
    (implied * modifier).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
