//! Time series data handling for forecasting
//!
//! The preprocessed inputs live as four flat numeric arrays on disk. They are
//! produced upstream and only ever read here.

use crate::config::StoreConfig;
use crate::error::{ForecastError, Result};
use ndarray::Array1;
use ndarray_npy::ReadNpyExt;
use std::collections::HashMap;
use std::fmt;
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Ordered sequence of finite observations indexed by position
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series, rejecting empty input and non-finite values
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "time series must not be empty".to_string(),
            ));
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "time series contains a non-finite value at position {}",
                pos
            )));
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }
}

/// The four series the forecasting pipeline can draw on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesName {
    /// Endogenous series as produced by the first preprocessing stage
    EndogenousRaw,
    /// Endogenous series with the seasonal component differenced away
    EndogenousSeasonal,
    /// Exogenous series as produced by the first preprocessing stage
    ExogenousRaw,
    /// Exogenous series with the seasonal component differenced away
    ExogenousSeasonal,
}

impl SeriesName {
    pub const ALL: [SeriesName; 4] = [
        SeriesName::EndogenousRaw,
        SeriesName::EndogenousSeasonal,
        SeriesName::ExogenousRaw,
        SeriesName::ExogenousSeasonal,
    ];

    /// File name of this series under the given store settings
    pub fn file_name<'a>(&self, config: &'a StoreConfig) -> &'a str {
        match self {
            SeriesName::EndogenousRaw => &config.endogenous_raw,
            SeriesName::EndogenousSeasonal => &config.endogenous_seasonal,
            SeriesName::ExogenousRaw => &config.exogenous_raw,
            SeriesName::ExogenousSeasonal => &config.exogenous_seasonal,
        }
    }
}

impl fmt::Display for SeriesName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeriesName::EndogenousRaw => "endogenous_raw",
            SeriesName::EndogenousSeasonal => "endogenous_seasonal_diff",
            SeriesName::ExogenousRaw => "exogenous_raw",
            SeriesName::ExogenousSeasonal => "exogenous_seasonal_diff",
        };
        f.write_str(name)
    }
}

/// Read-only access to the named input series
///
/// Implementations must return identical data for repeated loads of the same
/// name while a request is being served.
pub trait SeriesStore: Send + Sync {
    fn load(&self, name: SeriesName) -> Result<TimeSeries>;
}

impl<S: SeriesStore + ?Sized> SeriesStore for std::sync::Arc<S> {
    fn load(&self, name: SeriesName) -> Result<TimeSeries> {
        (**self).load(name)
    }
}

/// Series store backed by files in a data directory
///
/// `.npy` files are read as one-dimensional float or integer arrays; any other
/// extension is read as delimited text with one or more numbers per record.
#[derive(Debug, Clone)]
pub struct FileSeriesStore {
    config: StoreConfig,
}

impl FileSeriesStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Store reading the default file names from `data_dir`
    pub fn from_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self::new(StoreConfig::with_data_dir(data_dir.as_ref()))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Full path of a named series
    pub fn path_of(&self, name: SeriesName) -> PathBuf {
        self.config.data_dir.join(name.file_name(&self.config))
    }

    fn read_bytes(&self, name: SeriesName, path: &Path) -> Result<Vec<u8>> {
        let mut attempt = 0;
        loop {
            match std::fs::read(path) {
                Ok(bytes) => return Ok(bytes),
                Err(err) if is_transient(err.kind()) && attempt < self.config.read_retries => {
                    attempt += 1;
                    warn!(series = %name, attempt, error = %err, "retrying series read");
                }
                Err(err) => {
                    return Err(ForecastError::data_unavailable(
                        name.to_string(),
                        format!("{}: {}", path.display(), err),
                    ))
                }
            }
        }
    }
}

impl SeriesStore for FileSeriesStore {
    fn load(&self, name: SeriesName) -> Result<TimeSeries> {
        let path = self.path_of(name);
        let bytes = self.read_bytes(name, &path)?;

        let is_npy = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("npy"))
            .unwrap_or(false);
        let values = if is_npy {
            parse_npy(&bytes)
        } else {
            parse_delimited(&bytes)
        }
        .map_err(|reason| ForecastError::data_unavailable(name.to_string(), reason))?;

        debug!(series = %name, path = %path.display(), len = values.len(), "loaded series");
        TimeSeries::new(values)
            .map_err(|err| ForecastError::data_unavailable(name.to_string(), err))
    }
}

fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock
    )
}

fn parse_npy(bytes: &[u8]) -> std::result::Result<Vec<f64>, String> {
    match Array1::<f64>::read_npy(Cursor::new(bytes)) {
        Ok(array) => Ok(array.to_vec()),
        Err(float_err) => match Array1::<i64>::read_npy(Cursor::new(bytes)) {
            Ok(array) => Ok(array.iter().map(|&v| v as f64).collect()),
            Err(_) => Err(format!("not a 1-D numeric npy array: {}", float_err)),
        },
    }
}

fn parse_delimited(bytes: &[u8]) -> std::result::Result<Vec<f64>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|err| err.to_string())?;
        let parsed: std::result::Result<Vec<f64>, _> = record
            .iter()
            .filter(|field| !field.is_empty())
            .map(str::parse::<f64>)
            .collect();
        match parsed {
            Ok(row_values) => values.extend(row_values),
            // Single header line
            Err(_) if row == 0 => continue,
            Err(err) => return Err(format!("record {}: {}", row + 1, err)),
        }
    }
    Ok(values)
}

/// Series store holding its data in memory
///
/// Every load is recorded so callers can check which series a pipeline used.
#[derive(Debug, Default)]
pub struct InMemorySeriesStore {
    series: HashMap<SeriesName, TimeSeries>,
    requested: Mutex<Vec<SeriesName>>,
}

impl InMemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a named series
    pub fn with_series(mut self, name: SeriesName, series: TimeSeries) -> Self {
        self.series.insert(name, series);
        self
    }

    /// Store where raw and seasonal variants share the same data
    pub fn uniform(endogenous: TimeSeries, exogenous: TimeSeries) -> Self {
        Self::new()
            .with_series(SeriesName::EndogenousRaw, endogenous.clone())
            .with_series(SeriesName::EndogenousSeasonal, endogenous)
            .with_series(SeriesName::ExogenousRaw, exogenous.clone())
            .with_series(SeriesName::ExogenousSeasonal, exogenous)
    }

    /// Names loaded so far, in order
    pub fn requested(&self) -> Vec<SeriesName> {
        match self.requested.lock() {
            Ok(log) => log.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SeriesStore for InMemorySeriesStore {
    fn load(&self, name: SeriesName) -> Result<TimeSeries> {
        match self.requested.lock() {
            Ok(mut log) => log.push(name),
            Err(poisoned) => poisoned.into_inner().push(name),
        }
        self.series
            .get(&name)
            .cloned()
            .ok_or_else(|| ForecastError::data_unavailable(name.to_string(), "not present in store"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_series_rejects_empty_and_non_finite() {
        assert!(TimeSeries::new(vec![]).is_err());
        assert!(TimeSeries::new(vec![1.0, f64::NAN]).is_err());
        assert!(TimeSeries::new(vec![1.0, f64::INFINITY]).is_err());

        let series = TimeSeries::new(vec![1.0, 2.5]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last(), 2.5);
    }

    #[test]
    fn delimited_text_accepts_header_and_multiple_columns() {
        let text = b"value\n1.5\n2, 3\n\n4\n";
        assert_eq!(parse_delimited(text).unwrap(), vec![1.5, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn delimited_text_rejects_garbage_after_header() {
        let text = b"value\n1.5\nabc\n";
        assert!(parse_delimited(text).is_err());
    }

    #[test]
    fn in_memory_store_records_requests() {
        let series = TimeSeries::new(vec![1.0, 2.0]).unwrap();
        let store = InMemorySeriesStore::new().with_series(SeriesName::ExogenousRaw, series);

        assert!(store.load(SeriesName::ExogenousRaw).is_ok());
        assert!(store.load(SeriesName::EndogenousRaw).is_err());
        assert_eq!(
            store.requested(),
            vec![SeriesName::ExogenousRaw, SeriesName::EndogenousRaw]
        );
    }
}
