//! The Odds API (v4) leg source.
//!
//! Fetches upcoming events for one sport and turns every bookmaker
//! outcome into a leg with neutral confidence and no manual estimate.
//!
//! API docs: https://the-odds-api.com/liveapi/guides/v4/
//! Endpoint: `GET /v4/sports/{sport}/odds/?apiKey=..&regions=..&markets=..&oddsFormat=decimal`
//! Auth: `apiKey` query parameter. Free tier: 500 credits/month.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use super::{LegSource, SourceError};
use crate::types::Leg;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const BASE_URL: &str = "https://api.the-odds-api.com/v4";
const REQUEST_TIMEOUT_SECS: u64 = 10;

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

/// One upcoming event with its bookmaker quotes.
#[derive(Debug, Clone, Deserialize)]
pub struct OddsEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sport_key: String,
    #[serde(default)]
    pub commence_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bookmaker {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub markets: Vec<BookmakerMarket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookmakerMarket {
    /// "h2h", "spreads", "totals", ...
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Outcome {
    pub name: String,
    /// Decimal price.
    pub price: f64,
    /// Handicap or total line, present for spreads/totals.
    #[serde(default)]
    pub point: Option<f64>,
}

/// Map events to legs: one leg per outcome of every bookmaker market
/// whose key equals `market_key`. Other markets are ignored.
pub fn legs_from_events(events: &[OddsEvent], market_key: &str) -> Vec<Leg> {
    let mut legs = Vec::new();
    for event in events {
        let label = format!("{} vs {}", event.home_team, event.away_team);
        for bookmaker in &event.bookmakers {
            for market in bookmaker.markets.iter().filter(|m| m.key == market_key) {
                for outcome in &market.outcomes {
                    let name = match outcome.point {
                        Some(point) => format!("{} {point}", outcome.name),
                        None => outcome.name.clone(),
                    };
                    legs.push(Leg::new(label.clone(), name, outcome.price));
                }
            }
        }
    }
    legs
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// The Odds API client for one sport/region/market selection.
pub struct OddsApiClient {
    http: Client,
    api_key: SecretString,
    base_url: String,
    sport: String,
    region: String,
    market: String,
    name: String,
}

impl OddsApiClient {
    pub fn new(
        api_key: SecretString,
        sport: impl Into<String>,
        region: impl Into<String>,
        market: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent("PARLAY/0.1.0")
            .build()?;
        let sport = sport.into();

        Ok(Self {
            http,
            api_key,
            base_url: BASE_URL.to_string(),
            name: format!("odds-api:{sport}"),
            sport,
            region: region.into(),
            market: market.into(),
        })
    }

    /// Point the client at another host (local mock server, proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request URL without the API key, safe to log.
    fn redacted_url(&self) -> String {
        format!(
            "{}/sports/{}/odds/?regions={}&markets={}&oddsFormat=decimal",
            self.base_url,
            urlencoding::encode(&self.sport),
            urlencoding::encode(&self.region),
            urlencoding::encode(&self.market),
        )
    }

    async fn fetch_events(&self) -> Result<Vec<OddsEvent>, SourceError> {
        let url = self.redacted_url();
        debug!(url = %url, "Fetching odds");

        let resp = self
            .http
            .get(format!(
                "{url}&apiKey={}",
                urlencoding::encode(self.api_key.expose_secret())
            ))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(SourceError::Api { status, message });
        }

        if let Some(remaining) = resp.headers().get("x-requests-remaining") {
            debug!(remaining = ?remaining, "Odds API quota");
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl LegSource for OddsApiClient {
    async fn fetch_legs(&self) -> Result<Vec<Leg>, SourceError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(SourceError::MissingKey(self.name.clone()));
        }
        let events = self.fetch_events().await?;
        let legs = legs_from_events(&events, &self.market);
        debug!(sport = %self.sport, events = events.len(), legs = legs.len(), "Odds mapped to legs");
        Ok(legs)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NEUTRAL_CONFIDENCE;

    const SAMPLE: &str = r#"[
      {
        "id": "e912304de2b2ce35b473ce2ecd3d1502",
        "sport_key": "soccer_epl",
        "commence_time": "2026-10-18T14:00:00Z",
        "home_team": "Arsenal",
        "away_team": "Chelsea",
        "bookmakers": [
          {
            "key": "williamhill",
            "title": "William Hill",
            "markets": [
              {
                "key": "h2h",
                "outcomes": [
                  {"name": "Arsenal", "price": 2.1},
                  {"name": "Chelsea", "price": 3.4},
                  {"name": "Draw", "price": 3.5}
                ]
              },
              {
                "key": "totals",
                "outcomes": [
                  {"name": "Over", "price": 1.9, "point": 2.5},
                  {"name": "Under", "price": 1.95, "point": 2.5}
                ]
              }
            ]
          }
        ]
      },
      {
        "id": "b2",
        "sport_key": "soccer_epl",
        "commence_time": "2026-10-18T16:30:00Z",
        "home_team": "Everton",
        "away_team": "Fulham",
        "bookmakers": []
      }
    ]"#;

    fn events() -> Vec<OddsEvent> {
        serde_json::from_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_h2h_outcomes_become_legs() {
        let legs = legs_from_events(&events(), "h2h");
        assert_eq!(legs.len(), 3);
        assert_eq!(legs[0].event, "Arsenal vs Chelsea");
        assert_eq!(legs[0].market, "Arsenal");
        assert_eq!(legs[0].odds, 2.1);
        assert_eq!(legs[2].market, "Draw");
        assert!(legs.iter().all(|l| l.confidence == NEUTRAL_CONFIDENCE && l.manual_prob == 0.0));
    }

    #[test]
    fn test_totals_include_point() {
        let legs = legs_from_events(&events(), "totals");
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].market, "Over 2.5");
        assert_eq!(legs[1].market, "Under 2.5");
    }

    #[test]
    fn test_unknown_market_yields_nothing() {
        assert!(legs_from_events(&events(), "spreads").is_empty());
    }

    #[test]
    fn test_event_without_bookmakers() {
        let evs = events();
        assert!(evs[1].bookmakers.is_empty());
        assert!(legs_from_events(&evs[1..], "h2h").is_empty());
    }

    #[test]
    fn test_redacted_url_has_no_key() {
        let client = OddsApiClient::new(SecretString::new("s3cret".into()), "soccer_epl", "uk", "h2h")
            .unwrap();
        let url = client.redacted_url();
        assert!(url.starts_with("https://api.the-odds-api.com/v4/sports/soccer_epl/odds/"));
        assert!(url.contains("regions=uk"));
        assert!(!url.contains("s3cret"));
        assert_eq!(client.name(), "odds-api:soccer_epl");
    }

    #[tokio::test]
    async fn test_empty_key_is_rejected_without_request() {
        let client = OddsApiClient::new(SecretString::new(String::new()), "soccer_epl", "uk", "h2h")
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let err = client.fetch_legs().await.unwrap_err();
        assert!(matches!(err, SourceError::MissingKey(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let client = OddsApiClient::new(SecretString::new("k".into()), "soccer_epl", "uk", "h2h")
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let err = client.fetch_legs().await.unwrap_err();
        assert!(matches!(err, SourceError::Http(_)));
    }
}
