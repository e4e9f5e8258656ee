//! API route handlers

use crate::error::ApiError;
use crate::render;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use forecast_core::models::{ModelOrder, SeasonalOrder};
use forecast_core::{ForecastError, ForecastRequest, ForecastResult, ModelKind};
use serde::Deserialize;
use tracing::{debug, warn};

/// Query parameters of `POST /forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastParams {
    pub method: String,
    #[serde(default = "default_steps")]
    pub steps: i64,
    #[serde(default = "default_order_p")]
    pub order_p: i64,
    #[serde(default)]
    pub order_d: i64,
    #[serde(default = "default_order_q")]
    pub order_q: i64,
    #[serde(default)]
    pub seasonal_p: i64,
    #[serde(default)]
    pub seasonal_d: i64,
    #[serde(default)]
    pub seasonal_q: i64,
    #[serde(default = "default_seasonal_m")]
    pub seasonal_m: i64,
}

fn default_steps() -> i64 {
    10
}

fn default_order_p() -> i64 {
    4
}

fn default_order_q() -> i64 {
    4
}

fn default_seasonal_m() -> i64 {
    12
}

/// Future regressor values, either bare or wrapped
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UsdRates {
    Bare(Vec<f64>),
    Wrapped { usd_rates: Vec<f64> },
}

impl UsdRates {
    pub fn into_values(self) -> Vec<f64> {
        match self {
            UsdRates::Bare(values) | UsdRates::Wrapped { usd_rates: values } => values,
        }
    }
}

impl ForecastParams {
    /// Turn query parameters and body into a pipeline request.
    ///
    /// The method and step count are checked before anything else.
    pub fn into_request(self, usd_rates: Vec<f64>) -> Result<ForecastRequest, ForecastError> {
        let kind: ModelKind = self.method.parse()?;
        let horizon = usize::try_from(self.steps)
            .ok()
            .filter(|&steps| steps >= 1)
            .ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "steps must be at least 1, got {}",
                    self.steps
                ))
            })?;

        let order = ModelOrder::from_signed(self.order_p, self.order_d, self.order_q)?;
        let seasonal_order = SeasonalOrder::from_signed(
            self.seasonal_p,
            self.seasonal_d,
            self.seasonal_q,
            self.seasonal_m,
        )?;

        Ok(ForecastRequest::new(kind, usd_rates)
            .with_horizon(horizon)
            .with_order(order)
            .with_seasonal_order(seasonal_order))
    }
}

pub async fn index() -> Html<String> {
    Html(render::index_page())
}

pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Fit the requested model and return the forecast table
pub async fn forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastParams>,
    headers: HeaderMap,
    Json(body): Json<UsdRates>,
) -> Result<Response, ApiError> {
    let request = params.into_request(body.into_values())?;
    request.validate()?;
    debug!(kind = %request.kind, steps = request.horizon, "forecast accepted");

    let result = run_forecast(&state, request).await?;

    if wants_json(&headers) {
        Ok(Json(result).into_response())
    } else {
        Ok(Html(render::forecast_page(&result)).into_response())
    }
}

async fn run_forecast(state: &AppState, request: ForecastRequest) -> Result<ForecastResult, ApiError> {
    let engine = state.engine.clone();
    let task = tokio::task::spawn_blocking(move || engine.forecast(&request));

    let joined = match state.fit_timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(timeout = ?limit, "forecast abandoned");
                return Err(ApiError::Timeout(limit));
            }
        },
        None => task.await,
    };

    let result = joined.map_err(|err| ApiError::Task(err.to_string()))??;
    Ok(result)
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}
