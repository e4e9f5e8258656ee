//! Configuration for the series store and the forecast engine

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

/// Settings that shape fitting and the forecast output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Date the forecast axis is anchored to; the first row is the day after
    pub anchor_date: NaiveDate,
    /// Confidence level of the forecast intervals, in (0, 1)
    pub confidence_level: f64,
    /// Optimizer iteration budget per estimated parameter
    pub max_iterations_per_param: usize,
    /// Relative convergence tolerance of the optimizer
    pub tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // 2024-01-01 is always a valid calendar date
            anchor_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            confidence_level: 0.95,
            max_iterations_per_param: 2000,
            tolerance: 1e-8,
        }
    }
}

impl EngineConfig {
    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::Config(format!(
                "confidence level must be between 0 and 1, got {}",
                self.confidence_level
            )));
        }
        if self.max_iterations_per_param == 0 {
            return Err(ForecastError::Config(
                "optimizer iteration budget must be positive".to_string(),
            ));
        }
        if !(self.tolerance > 0.0) {
            return Err(ForecastError::Config(format!(
                "optimizer tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Location and file names of the preprocessed series
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub endogenous_raw: String,
    pub endogenous_seasonal: String,
    pub exogenous_raw: String,
    pub exogenous_seasonal: String,
    /// Extra attempts on transient read failures
    pub read_retries: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/preprocessed"),
            endogenous_raw: "end_diff.npy".to_string(),
            endogenous_seasonal: "end_seasonal_diff.npy".to_string(),
            exogenous_raw: "exg_diff.npy".to_string(),
            exogenous_seasonal: "exg_seasonal_diff.npy".to_string(),
            read_retries: 2,
        }
    }
}

impl StoreConfig {
    /// Default file names under a different directory
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.anchor_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(config.confidence_level, 0.95);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_confidence_level_outside_unit_interval() {
        for level in [0.0, 1.0, 1.5, -0.1, f64::NAN] {
            let config = EngineConfig {
                confidence_level: level,
                ..EngineConfig::default()
            };
            assert!(config.validate().is_err(), "level {level} accepted");
        }
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"anchor_date": "2025-03-31"}"#).unwrap();
        assert_eq!(config.anchor_date, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert_eq!(config.confidence_level, 0.95);

        let store: StoreConfig = serde_json::from_str(r#"{"data_dir": "/srv/data"}"#).unwrap();
        assert_eq!(store.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(store.exogenous_seasonal, "exg_seasonal_diff.npy");
    }
}
