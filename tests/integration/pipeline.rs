//! Full pipeline: sources → plan → CSV.

use std::collections::HashSet;

use parlay::data::{load_legs, LegSource};
use parlay::export::{to_csv, CSV_HEADER};
use parlay::strategy::combos::combination_count;
use parlay::strategy::{plan, ComboRequest};
use parlay::types::Leg;
use parlay::{estimate_probability, generate_combos};

use crate::mock_source::{failing_source, source_with, weekend_slate};

#[tokio::test]
async fn test_sources_to_ranked_csv() {
    let sources: Vec<Box<dyn LegSource>> = vec![Box::new(source_with("odds-api:mock", weekend_slate()))];
    let legs = load_legs(&sources).await;

    let request = ComboRequest { top_n: Some(10), ..Default::default() };
    let report = plan(&legs, &request);

    assert_eq!(report.legs_considered, 6);
    assert_eq!(report.total_combos as u128, combination_count(6, 3) + combination_count(6, 4));
    assert_eq!(report.combos.len(), 10);
    for pair in report.combos.windows(2) {
        assert!(pair[0].probability >= pair[1].probability);
    }

    let csv = to_csv(&report.combos);
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines.len(), 11);
}

#[tokio::test]
async fn test_upstream_failure_yields_empty_report() {
    let sources: Vec<Box<dyn LegSource>> = vec![Box::new(failing_source("odds-api:down"))];
    let legs = load_legs(&sources).await;

    let report = plan(&legs, &ComboRequest::default());
    assert_eq!(report.total_combos, 0);
    assert!(report.combos.is_empty());
    assert_eq!(to_csv(&report.combos), format!("{CSV_HEADER}\n"));
}

#[test]
fn test_min_confidence_drops_low_legs() {
    let request = ComboRequest { min_confidence: 0.5, top_n: None, ..Default::default() };
    let report = plan(&weekend_slate(), &request);
    // "Lyon vs Nice" (0.3) is filtered out
    assert_eq!(report.legs_considered, 5);
    assert!(report.combos.iter().all(|c| !c.legs.contains("Lyon vs Nice")));
    assert_eq!(report.total_combos, 10 + 5);
}

#[test]
fn test_manual_probability_flows_into_combo() {
    let legs = weekend_slate();
    let combos = generate_combos(&legs[2..5], &[3], 10.0);
    assert_eq!(combos.len(), 1);

    // Celtic leg blends 0.8 manual with 1/1.35 implied at confidence 0.8
    let celtic = estimate_probability(1.35, 0.8, 0.8);
    assert!((celtic - (0.8 * 0.8 + 0.2 / 1.35)).abs() < 1e-12);

    let expected = legs[2].estimated_probability() * legs[3].estimated_probability() * celtic;
    assert!((combos[0].probability - expected).abs() < 1e-12);
    assert_eq!(combos[0].combined_odds, 3.715);
    assert_eq!(combos[0].potential_payout, 37.15);
}

#[test]
fn test_member_sets_unique_across_sizes() {
    let combos = generate_combos(&weekend_slate(), &[3, 4], 5.0);
    let sets: HashSet<_> = combos.iter().map(|c| (c.size, c.legs.clone())).collect();
    assert_eq!(sets.len(), combos.len());
}

#[test]
fn test_same_request_twice_is_identical() {
    let legs: Vec<Leg> = weekend_slate();
    let request = ComboRequest { top_n: None, ..Default::default() };
    let a = plan(&legs, &request);
    let b = plan(&legs, &request);
    assert_eq!(a.combos, b.combos);
    assert_eq!(a.total_combos, b.total_combos);
}
