//! Utility functions for the forecast_core crate

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};

/// Consecutive daily dates starting the day after `anchor`
pub fn future_dates(anchor: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(horizon);
    let mut current = anchor;

    for _ in 0..horizon {
        current = current.checked_add_signed(Duration::days(1)).ok_or_else(|| {
            ForecastError::InvalidParameter(format!(
                "forecast of {} days from {} runs past the supported calendar",
                horizon, anchor
            ))
        })?;
        dates.push(current);
    }

    Ok(dates)
}
