//! Command-line and environment configuration for the server

use chrono::NaiveDate;
use clap::Parser;
use forecast_core::{EngineConfig, StoreConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Forecast server settings. Every flag falls back to an environment
/// variable, which may also come from a `.env` file.
#[derive(Debug, Clone, Parser)]
#[command(name = "forecast-server", version, about = "Crude oil price forecasting service")]
pub struct ServerArgs {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Directory holding the preprocessed series files
    #[arg(long, env = "DATA_DIR", default_value = "data/preprocessed")]
    pub data_dir: PathBuf,

    /// Day before the first forecast date
    #[arg(long, env = "ANCHOR_DATE", default_value = "2024-01-01")]
    pub anchor_date: NaiveDate,

    /// Confidence level of the forecast intervals
    #[arg(long, env = "CONFIDENCE_LEVEL", default_value_t = 0.95)]
    pub confidence_level: f64,

    /// Abandon a fit after this many seconds
    #[arg(long, env = "FIT_TIMEOUT_SECS")]
    pub fit_timeout_secs: Option<u64>,

    /// Extra attempts for transient read errors
    #[arg(long, env = "READ_RETRIES", default_value_t = 2)]
    pub read_retries: usize,
}

impl ServerArgs {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            anchor_date: self.anchor_date,
            confidence_level: self.confidence_level,
            ..EngineConfig::default()
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            read_retries: self.read_retries,
            ..StoreConfig::with_data_dir(self.data_dir.clone())
        }
    }

    pub fn fit_timeout(&self) -> Option<Duration> {
        self.fit_timeout_secs.map(Duration::from_secs)
    }
}
