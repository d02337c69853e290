//! Dashboard API route handlers.
//!
//! JSON endpoints plus a CSV download. State is shared via
//! `Arc<DashboardState>`; generation runs on a blocking thread against a
//! cloned snapshot of the legs.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::data;
use crate::export;
use crate::strategy::{self, ComboReport, ComboRequest, RequestError};
use crate::types::Leg;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub config: AppConfig,
    pub legs: RwLock<Vec<Leg>>,
}

impl DashboardState {
    pub fn new(config: AppConfig, legs: Vec<Leg>) -> Self {
        Self {
            config,
            legs: RwLock::new(legs),
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string of `GET /api/combos`; unset fields use `[combos]` config.
#[derive(Debug, Default, Deserialize)]
pub struct ComboQuery {
    /// Comma-separated sizes, e.g. "3,4".
    pub sizes: Option<String>,
    pub stake: Option<f64>,
    pub top_n: Option<usize>,
    pub min_confidence: Option<f64>,
    pub min_odds: Option<f64>,
    pub max_odds: Option<f64>,
}

impl ComboQuery {
    /// Merge onto the configured defaults and validate.
    pub fn into_request(self, defaults: ComboRequest) -> Result<ComboRequest, ApiError> {
        let sizes = match self.sizes {
            Some(raw) => parse_sizes(&raw)?,
            None => defaults.sizes,
        };
        let request = ComboRequest {
            sizes,
            stake: self.stake.unwrap_or(defaults.stake),
            top_n: self.top_n.or(defaults.top_n),
            min_confidence: self.min_confidence.unwrap_or(defaults.min_confidence),
            min_odds: self.min_odds.unwrap_or(defaults.min_odds),
            max_odds: self.max_odds.unwrap_or(defaults.max_odds),
        };
        request.validate()?;
        Ok(request)
    }
}

/// Body of `POST /api/combos`: an explicit leg list plus parameters.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub legs: Vec<Leg>,
    #[serde(flatten)]
    pub request: ComboRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub legs: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Handler error mapped to an HTTP status with a JSON body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<RequestError> for ApiError {
    fn from(e: RequestError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

fn parse_sizes(raw: &str) -> Result<Vec<usize>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| ApiError::BadRequest(format!("invalid combo size: {s}")))
        })
        .collect()
}

/// Run the planner off the async runtime.
async fn run_plan(legs: Vec<Leg>, request: ComboRequest) -> Result<ComboReport, ApiError> {
    tokio::task::spawn_blocking(move || strategy::plan(&legs, &request))
        .await
        .map_err(|e| {
            error!(error = %e, "Combo generation task failed");
            ApiError::Internal("combo generation failed".to_string())
        })
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/legs
pub async fn get_legs(State(state): State<AppState>) -> Json<Vec<Leg>> {
    Json(state.legs.read().await.clone())
}

/// POST /api/legs/refresh
pub async fn refresh_legs(State(state): State<AppState>) -> Json<RefreshResponse> {
    let legs = data::collect_legs(&state.config).await;
    let count = legs.len();
    *state.legs.write().await = legs;
    info!(legs = count, "Legs refreshed");
    Json(RefreshResponse { legs: count })
}

/// GET /api/combos
pub async fn get_combos(
    State(state): State<AppState>,
    Query(query): Query<ComboQuery>,
) -> Result<Json<ComboReport>, ApiError> {
    let request = query.into_request(state.config.combo_request())?;
    let legs = state.legs.read().await.clone();
    Ok(Json(run_plan(legs, request).await?))
}

/// GET /api/combos.csv
pub async fn get_combos_csv(
    State(state): State<AppState>,
    Query(query): Query<ComboQuery>,
) -> Result<Response, ApiError> {
    let request = query.into_request(state.config.combo_request())?;
    let legs = state.legs.read().await.clone();
    let report = run_plan(legs, request).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"combos.csv\""),
        ],
        export::to_csv(&report.combos),
    )
        .into_response())
}

/// POST /api/combos
pub async fn post_combos(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<ComboReport>, ApiError> {
    body.request.validate()?;

    let max_legs = state.config.combos.max_legs;
    if body.legs.len() > max_legs {
        warn!(legs = body.legs.len(), max_legs, "Rejecting oversized leg list");
        return Err(ApiError::BadRequest(format!(
            "too many legs: {} (max {max_legs})",
            body.legs.len()
        )));
    }

    Ok(Json(run_plan(body.legs, body.request).await?))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
