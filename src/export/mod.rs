//! CSV export of ranked combos.
//!
//! Column order is fixed and matches the fields of `Combo`:
//! `legs,size,probability_pct,combined_odds,potential_payout`.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::types::Combo;

pub const CSV_HEADER: &str = "legs,size,probability_pct,combined_odds,potential_payout";

/// Render combos as CSV text (header + one line per combo).
pub fn to_csv(combos: &[Combo]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + combos.len() * 96);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for combo in combos {
        out.push_str(&escape_field(&combo.legs));
        out.push(',');
        out.push_str(&combo.size.to_string());
        out.push(',');
        out.push_str(&combo.probability_pct.to_string());
        out.push(',');
        out.push_str(&combo.combined_odds.to_string());
        out.push(',');
        out.push_str(&combo.potential_payout.to_string());
        out.push('\n');
    }
    out
}

/// Write combos to a CSV file, replacing it if present.
pub fn write_csv(path: impl AsRef<Path>, combos: &[Combo]) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, to_csv(combos))
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
    info!(path = %path.display(), rows = combos.len(), "CSV exported");
    Ok(())
}

/// Quote a field when it contains a delimiter, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
