//! # crude_forecast_workspace
//!
//! Crude oil price forecasting with ARIMA and SARIMA models driven by a USD
//! exchange-rate regressor.
//!
//! ## Example
//!
//! ```
//! use crude_forecast_workspace::pipeline::ModelKind;
//!
//! let kind: ModelKind = "sarima".parse().unwrap();
//! assert_eq!(kind, ModelKind::Sarima);
//! ```

/// Data loading, model fitting and the forecast pipeline
pub use forecast_core as pipeline;

/// HTTP service around the pipeline
pub use forecast_server as server;

/// Returns the version of the workspace crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }
}
