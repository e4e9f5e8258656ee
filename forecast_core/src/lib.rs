//! # Forecast Core
//!
//! ARIMA and SARIMA forecasting of a daily price series driven by an
//! exogenous regressor.
//!
//! ## Features
//!
//! - Read-only access to preprocessed series stored as `.npy` or text files
//! - ARIMA and SARIMA models with one exogenous regressor, fitted by
//!   conditional least squares
//! - Point forecasts with confidence intervals from propagated forecast variance
//! - Forecast rows aligned to a daily calendar after a configured anchor date
//!
//! ## Model kinds
//!
//! The kind decides which series pair is fitted:
//!
//! - **arima**: the seasonally differenced endogenous and exogenous series
//! - **sarima**: the raw series, with seasonal differencing inside the model
//!
//! ## Quick Start
//!
//! ```no_run
//! use forecast_core::{EngineConfig, FileSeriesStore, ForecastEngine, ForecastRequest, ModelKind};
//! use forecast_core::models::ModelOrder;
//!
//! let store = FileSeriesStore::from_dir("data/preprocessed");
//! let engine = ForecastEngine::new(store, EngineConfig::default())?;
//!
//! let request = ForecastRequest::new(ModelKind::Arima, vec![83.0, 83.1, 83.4])
//!     .with_order(ModelOrder::new(1, 1, 1));
//! let result = engine.forecast(&request)?;
//!
//! for row in &result.rows {
//!     println!("{} {:.2} [{:.2}, {:.2}]", row.date, row.forecast, row.lower_ci, row.upper_ci);
//! }
//! # Ok::<(), forecast_core::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;
pub mod optimization;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{EngineConfig, StoreConfig};
pub use crate::data::{FileSeriesStore, InMemorySeriesStore, SeriesName, SeriesStore, TimeSeries};
pub use crate::engine::{ForecastEngine, ForecastRequest, ForecastResult, ForecastRow, ModelKind};
pub use crate::error::{ErrorKind, ForecastError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
