//! Forecasting models for time series data

use crate::config::EngineConfig;
use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use serde::Serialize;
use std::fmt::{self, Debug};

pub mod arima;
pub mod polynomial;
pub mod sarima;
pub mod sarimax;

pub use arima::ArimaModel;
pub use sarima::SarimaModel;
pub use sarimax::FittedModel;

/// Non-seasonal order (p, d, q)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ModelOrder {
    /// AR order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// MA order
    pub q: usize,
}

impl ModelOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Build from signed request values; negative orders cannot be fitted
    pub fn from_signed(p: i64, d: i64, q: i64) -> Result<Self> {
        Ok(Self {
            p: non_negative("p", p)?,
            d: non_negative("d", d)?,
            q: non_negative("q", q)?,
        })
    }
}

impl Default for ModelOrder {
    fn default() -> Self {
        Self::new(4, 0, 4)
    }
}

impl fmt::Display for ModelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.d, self.q)
    }
}

/// Seasonal order (P, D, Q, m)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SeasonalOrder {
    /// Seasonal AR order
    pub p: usize,
    /// Seasonal differencing order
    pub d: usize,
    /// Seasonal MA order
    pub q: usize,
    /// Season length in observations
    pub period: usize,
}

impl SeasonalOrder {
    pub fn new(p: usize, d: usize, q: usize, period: usize) -> Self {
        Self { p, d, q, period }
    }

    /// No seasonal component
    pub fn none() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Build from signed request values; negative orders cannot be fitted
    pub fn from_signed(p: i64, d: i64, q: i64, period: i64) -> Result<Self> {
        Ok(Self {
            p: non_negative("seasonal P", p)?,
            d: non_negative("seasonal D", d)?,
            q: non_negative("seasonal Q", q)?,
            period: non_negative("seasonal period", period)?,
        })
    }

    /// Whether any seasonal term is present
    pub fn is_active(&self) -> bool {
        self.p > 0 || self.d > 0 || self.q > 0
    }
}

impl Default for SeasonalOrder {
    fn default() -> Self {
        Self::new(0, 0, 0, 12)
    }
}

impl fmt::Display for SeasonalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.p, self.d, self.q, self.period)
    }
}

fn non_negative(label: &str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        ForecastError::FitFailure(format!("{} order must be non-negative, got {}", label, value))
    })
}

/// Optimizer settings used while fitting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Iteration budget per estimated parameter
    pub max_iterations_per_param: usize,
    /// Relative convergence tolerance
    pub tolerance: f64,
}

impl From<&EngineConfig> for FitOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_iterations_per_param: config.max_iterations_per_param,
            tolerance: config.tolerance,
        }
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

/// Point forecasts with interval bounds, one entry per step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDistribution {
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Confidence level the bounds were computed at
    pub confidence_level: f64,
}

impl ForecastDistribution {
    /// Number of forecast steps
    pub fn horizon(&self) -> usize {
        self.mean.len()
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Forecast one step per element of `future_exog`, driving the
    /// exogenous term with those values
    fn forecast(&self, future_exog: &[f64], confidence_level: f64)
        -> Result<ForecastDistribution>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on an endogenous series and its regressor
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Fit the model to the data
    fn train(&self, endog: &TimeSeries, exog: &TimeSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_orders_are_fit_failures() {
        let err = ModelOrder::from_signed(1, -1, 1).unwrap_err();
        assert!(matches!(err, ForecastError::FitFailure(_)));
        assert!(SeasonalOrder::from_signed(0, 0, 0, -12).is_err());
        assert_eq!(
            ModelOrder::from_signed(2, 1, 0).unwrap(),
            ModelOrder::new(2, 1, 0)
        );
    }

    #[test]
    fn seasonal_order_activity() {
        assert!(!SeasonalOrder::default().is_active());
        assert!(SeasonalOrder::new(0, 1, 0, 12).is_active());
    }

    #[test]
    fn fit_options_follow_engine_config() {
        let config = EngineConfig {
            max_iterations_per_param: 50,
            tolerance: 1e-4,
            ..EngineConfig::default()
        };
        let options = FitOptions::from(&config);
        assert_eq!(options.max_iterations_per_param, 50);
        assert_eq!(options.tolerance, 1e-4);
        assert_eq!(
            FitOptions::default().max_iterations_per_param,
            EngineConfig::default().max_iterations_per_param
        );
    }
}
