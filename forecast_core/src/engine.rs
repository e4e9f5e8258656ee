//! The fit-and-forecast pipeline
//!
//! Each call to [`ForecastEngine::forecast`] is an independent pass:
//! validate the request, load the series pair for the model kind, fit,
//! forecast, and attach a date axis. Nothing is retained between calls.

use crate::config::EngineConfig;
use crate::data::{SeriesName, SeriesStore};
use crate::error::{ForecastError, Result};
use crate::models::{
    ArimaModel, FitOptions, ForecastDistribution, ForecastModel, ModelOrder, SarimaModel,
    SeasonalOrder, TrainedForecastModel,
};
use crate::utils::future_dates;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Model family to fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// ARIMA on the seasonally differenced series
    Arima,
    /// SARIMA on the raw series
    Sarima,
}

impl ModelKind {
    /// Endogenous and exogenous series this kind is fitted on
    pub fn series_pair(&self) -> (SeriesName, SeriesName) {
        match self {
            ModelKind::Arima => (SeriesName::EndogenousSeasonal, SeriesName::ExogenousSeasonal),
            ModelKind::Sarima => (SeriesName::EndogenousRaw, SeriesName::ExogenousRaw),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Arima => "arima",
            ModelKind::Sarima => "sarima",
        }
    }
}

impl FromStr for ModelKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arima" | "plain" => Ok(ModelKind::Arima),
            "sarima" | "seasonal" => Ok(ModelKind::Sarima),
            _ => Err(ForecastError::InvalidParameter(format!(
                "Method must be either 'arima' or 'sarima', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single forecast to compute
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub kind: ModelKind,
    pub order: ModelOrder,
    /// Only used for [`ModelKind::Sarima`]
    pub seasonal_order: SeasonalOrder,
    pub horizon: usize,
    /// Regressor values driving each forecast step
    pub future_exog: Vec<f64>,
}

impl ForecastRequest {
    /// Request with default orders and a horizon equal to the number of
    /// future exogenous values
    pub fn new(kind: ModelKind, future_exog: Vec<f64>) -> Self {
        Self {
            kind,
            order: ModelOrder::default(),
            seasonal_order: SeasonalOrder::default(),
            horizon: future_exog.len(),
            future_exog,
        }
    }

    pub fn with_order(mut self, order: ModelOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_seasonal_order(mut self, seasonal_order: SeasonalOrder) -> Self {
        self.seasonal_order = seasonal_order;
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Check the request before any data is touched
    pub fn validate(&self) -> Result<()> {
        if self.horizon < 1 {
            return Err(ForecastError::InvalidParameter(
                "steps must be at least 1".to_string(),
            ));
        }
        if self.future_exog.len() != self.horizon {
            return Err(ForecastError::InvalidParameter(format!(
                "expected {} future exogenous values for {} steps, got {}",
                self.horizon,
                self.horizon,
                self.future_exog.len()
            )));
        }
        if self.future_exog.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "future exogenous values must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// One forecast step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub forecast: f64,
    pub lower_ci: f64,
    pub upper_ci: f64,
}

impl ForecastRow {
    /// Whether the interval brackets the point forecast
    pub fn is_ordered(&self) -> bool {
        self.lower_ci <= self.forecast && self.forecast <= self.upper_ci
    }
}

/// Complete forecast with the parameters it was produced under
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub kind: ModelKind,
    pub model: String,
    pub order: ModelOrder,
    /// Present for seasonal models only
    pub seasonal_order: Option<SeasonalOrder>,
    pub confidence_level: f64,
    pub rows: Vec<ForecastRow>,
}

impl ForecastResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Indices of rows whose interval does not bracket the point forecast
    pub fn inverted_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.is_ordered())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Runs the forecasting pipeline against a series store
#[derive(Debug, Clone)]
pub struct ForecastEngine<S> {
    store: S,
    config: EngineConfig,
}

impl<S: SeriesStore> ForecastEngine<S> {
    pub fn new(store: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fit the requested model and forecast `request.horizon` days.
    ///
    /// Rows whose interval is inverted are returned unchanged and logged.
    pub fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResult> {
        request.validate()?;
        let started = Instant::now();
        info!(
            kind = %request.kind,
            order = %request.order,
            horizon = request.horizon,
            "forecast requested"
        );

        let (endog_name, exog_name) = request.kind.series_pair();
        let endog = self.store.load(endog_name)?;
        let exog = self.store.load(exog_name)?;
        debug!(endog = %endog_name, exog = %exog_name, len = endog.len(), "series loaded");

        let options = FitOptions::from(&self.config);
        let level = self.config.confidence_level;
        let (model, distribution, seasonal_order) = match request.kind {
            ModelKind::Arima => {
                let model = ArimaModel::new(request.order).with_options(options);
                let trained = model.train(&endog, &exog)?;
                let distribution = trained.forecast(&request.future_exog, level)?;
                (trained.name().to_string(), distribution, None)
            }
            ModelKind::Sarima => {
                let model = SarimaModel::new(request.order, request.seasonal_order)
                    .with_options(options);
                let trained = model.train(&endog, &exog)?;
                let distribution = trained.forecast(&request.future_exog, level)?;
                (
                    trained.name().to_string(),
                    distribution,
                    Some(request.seasonal_order),
                )
            }
        };

        let rows = self.align(&distribution)?;
        let result = ForecastResult {
            kind: request.kind,
            model,
            order: request.order,
            seasonal_order,
            confidence_level: level,
            rows,
        };

        let inverted = result.inverted_rows();
        if !inverted.is_empty() {
            warn!(model = %result.model, rows = ?inverted, "forecast interval does not bracket the point estimate");
        }
        info!(
            model = %result.model,
            rows = result.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "forecast completed"
        );
        Ok(result)
    }

    fn align(&self, distribution: &ForecastDistribution) -> Result<Vec<ForecastRow>> {
        let dates = future_dates(self.config.anchor_date, distribution.horizon())?;
        Ok(dates
            .into_iter()
            .zip(&distribution.mean)
            .zip(distribution.lower.iter().zip(&distribution.upper))
            .map(|((date, &forecast), (&lower_ci, &upper_ci))| ForecastRow {
                date,
                forecast,
                lower_ci,
                upper_ci,
            })
            .collect())
    }
}
