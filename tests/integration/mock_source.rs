//! Mock leg source for integration testing.
//!
//! Uses `mockall` to stand in for the Odds API so source failures and
//! fixed slates can be driven deterministically.

use mockall::mock;

use parlay::data::{load_legs, LegSource, SourceError};
use parlay::types::Leg;

mock! {
    pub Source {}

    #[async_trait::async_trait]
    impl LegSource for Source {
        async fn fetch_legs(&self) -> Result<Vec<Leg>, SourceError>;
        fn name(&self) -> &str;
    }
}

/// Mock returning `legs` exactly once.
pub fn source_with(name: &'static str, legs: Vec<Leg>) -> MockSource {
    let mut source = MockSource::new();
    source.expect_fetch_legs().times(1).return_once(move || Ok(legs));
    source.expect_name().return_const(name.to_string());
    source
}

/// Mock failing like an exhausted Odds API quota.
pub fn failing_source(name: &'static str) -> MockSource {
    let mut source = MockSource::new();
    source.expect_fetch_legs().times(1).returning(|| {
        Err(SourceError::Api {
            status: 429,
            message: "usage quota has been reached".to_string(),
        })
    });
    source.expect_name().return_const(name.to_string());
    source
}

pub fn weekend_slate() -> Vec<Leg> {
    vec![
        Leg::new("Arsenal vs Chelsea", "Arsenal", 2.10).with_confidence(0.65),
        Leg::new("Lyon vs Nice", "Draw", 3.40).with_confidence(0.3),
        Leg::new("Inter vs Roma", "Inter", 1.72).with_confidence(0.7),
        Leg::new("PSV vs Ajax", "Over 2.5", 1.60),
        Leg::new("Celtic vs Hearts", "Celtic", 1.35).with_confidence(0.8).with_manual_prob(0.8),
        Leg::new("Porto vs Braga", "Porto", 1.90).with_confidence(0.55),
    ]
}

#[tokio::test]
async fn test_mock_source_feeds_load_legs() {
    let sources: Vec<Box<dyn LegSource>> = vec![Box::new(source_with("odds-api:mock", weekend_slate()))];
    let legs = load_legs(&sources).await;
    assert_eq!(legs, weekend_slate());
}

#[tokio::test]
async fn test_failing_source_degrades_to_empty() {
    let sources: Vec<Box<dyn LegSource>> = vec![Box::new(failing_source("odds-api:down"))];
    assert!(load_legs(&sources).await.is_empty());
}

#[tokio::test]
async fn test_failing_source_does_not_hide_others() {
    let sources: Vec<Box<dyn LegSource>> = vec![
        Box::new(failing_source("odds-api:down")),
        Box::new(source_with("slate-file", weekend_slate())),
    ];
    assert_eq!(load_legs(&sources).await.len(), 6);
}
