//! Combo enumeration.
//!
//! Enumerates every k-subset of the leg list in lexicographic index
//! order and derives combined probability, odds and payout for each.

use tracing::{debug, warn};

use crate::types::{Combo, Leg};

/// Above this many combos per run a warning is logged. Enumeration still
/// proceeds; bounding the leg count is up to the caller.
pub const LARGE_RUN_WARNING: u128 = 1_000_000;

/// Upper bound for the up-front `Vec` reservation.
const MAX_PREALLOCATED: usize = 100_000;

/// Separator between member labels in `Combo::legs`.
const LEG_SEPARATOR: &str = " | ";

// ---------------------------------------------------------------------------
// Index combinations
// ---------------------------------------------------------------------------

/// Iterator over all k-subsets of `0..n` in lexicographic order.
///
/// Yields `C(n, k)` index vectors, each strictly increasing.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        let k = self.indices.len();
        // Rightmost position that can still move right
        let Some(i) = (0..k).rev().find(|&i| self.indices[i] != i + self.n - k) else {
            self.done = true;
            return None;
        };

        self.indices[i] += 1;
        for j in (i + 1)..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.indices.clone())
    }
}

/// Binomial coefficient C(n, k), saturating at `u128::MAX`.
pub fn combination_count(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // result * (n - i) is always divisible by (i + 1) here
        result = match result.checked_mul((n - i) as u128) {
            Some(v) => v / (i as u128 + 1),
            None => return u128::MAX,
        };
    }
    result
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate every combo of each requested size.
///
/// Sizes are processed in the order given (duplicates and 0 ignored).
/// A size larger than the number of legs yields nothing. The result is
/// in generation order; ranking is left to the caller.
pub fn generate_combos(legs: &[Leg], sizes: &[usize], stake: f64) -> Vec<Combo> {
    let sizes = distinct_sizes(sizes);
    let expected = sizes
        .iter()
        .map(|&k| combination_count(legs.len(), k))
        .fold(0u128, u128::saturating_add);

    if expected > LARGE_RUN_WARNING {
        warn!(
            legs = legs.len(),
            sizes = ?sizes,
            expected,
            "Large combo run, consider lowering the leg count"
        );
    }

    // Each leg's estimate and label is needed in many combos
    let estimates: Vec<f64> = legs.iter().map(Leg::estimated_probability).collect();
    let labels: Vec<String> = legs.iter().map(Leg::label).collect();

    let capacity = usize::try_from(expected).unwrap_or(usize::MAX).min(MAX_PREALLOCATED);
    let mut combos = Vec::with_capacity(capacity);

    for k in sizes {
        if legs.len() < k {
            debug!(size = k, legs = legs.len(), "Not enough legs for combo size, skipping");
            continue;
        }

        for members in Combinations::new(legs.len(), k) {
            combos.push(build_combo(legs, &estimates, &labels, &members, stake));
        }
    }

    debug!(legs = legs.len(), combos = combos.len(), stake, "Combos generated");
    combos
}

/// Derive a combo record from member indices.
fn build_combo(
    legs: &[Leg],
    estimates: &[f64],
    labels: &[String],
    members: &[usize],
    stake: f64,
) -> Combo {
    let probability = members.iter().fold(1.0, |p, &i| p * estimates[i]);
    let odds = members.iter().fold(1.0, |o, &i| o * legs[i].odds);
    let description = members
        .iter()
        .map(|&i| labels[i].as_str())
        .collect::<Vec<_>>()
        .join(LEG_SEPARATOR);

    Combo {
        legs: description,
        size: members.len(),
        probability_pct: round_dp(probability * 100.0, 3),
        combined_odds: round_dp(odds, 3),
        potential_payout: round_dp(odds * stake, 2),
        probability,
    }
}

/// Keep the first occurrence of each positive size.
fn distinct_sizes(sizes: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(sizes.len());
    for &k in sizes {
        if k == 0 {
            debug!("Ignoring combo size 0");
            continue;
        }
        if !out.contains(&k) {
            out.push(k);
        }
    }
    out
}

/// Round to `dp` decimal places, ties to even.
pub fn round_dp(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).round_ties_even() / factor
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
