//! Seasonal ARIMA model with an exogenous regressor

use crate::data::TimeSeries;
use crate::error::Result;
use crate::models::{FitOptions, FittedModel, ForecastModel, ModelOrder, SeasonalOrder};

/// SARIMA model
///
/// Works on undifferenced series; seasonal differencing is part of the model.
/// No constant term is fitted, whatever the differencing order.
#[derive(Debug, Clone)]
pub struct SarimaModel {
    /// Name of the model
    name: String,
    order: ModelOrder,
    seasonal: SeasonalOrder,
    options: FitOptions,
}

impl SarimaModel {
    /// Create a new SARIMA model
    pub fn new(order: ModelOrder, seasonal: SeasonalOrder) -> Self {
        Self {
            name: format!(
                "SARIMA({},{},{})({},{},{})[{}]",
                order.p, order.d, order.q, seasonal.p, seasonal.d, seasonal.q, seasonal.period
            ),
            order,
            seasonal,
            options: FitOptions::default(),
        }
    }

    /// Use different optimizer settings
    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn order(&self) -> ModelOrder {
        self.order
    }

    pub fn seasonal_order(&self) -> SeasonalOrder {
        self.seasonal
    }
}

impl ForecastModel for SarimaModel {
    type Trained = FittedModel;

    fn train(&self, endog: &TimeSeries, exog: &TimeSeries) -> Result<FittedModel> {
        FittedModel::fit(
            self.name.clone(),
            endog.values(),
            exog.values(),
            self.order,
            self.seasonal,
            false,
            &self.options,
        )
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrainedForecastModel;

    /// Monthly-style cycle of length 12 on top of a regressor effect
    fn seasonal(n: usize) -> (TimeSeries, TimeSeries) {
        let exog: Vec<f64> = (0..n).map(|i| 5.0 + (i as f64 * 0.21).sin()).collect();
        let endog = exog
            .iter()
            .enumerate()
            .map(|(i, x)| {
                let season = (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin() * 4.0;
                20.0 + season + 1.5 * x + ((i * 37) % 11) as f64 * 0.05
            })
            .collect();
        (TimeSeries::new(endog).unwrap(), TimeSeries::new(exog).unwrap())
    }

    #[test]
    fn name_includes_seasonal_order() {
        let model = SarimaModel::new(ModelOrder::new(1, 0, 1), SeasonalOrder::new(1, 1, 0, 12));
        assert_eq!(model.name(), "SARIMA(1,0,1)(1,1,0)[12]");
    }

    #[test]
    fn seasonal_differencing_tracks_the_cycle() {
        let (endog, exog) = seasonal(144);
        let trained = SarimaModel::new(ModelOrder::new(0, 0, 0), SeasonalOrder::new(0, 1, 0, 12))
            .train(&endog, &exog)
            .unwrap();
        let future: Vec<f64> = (144..156).map(|i| 5.0 + (i as f64 * 0.21).sin()).collect();
        let dist = trained.forecast(&future, 0.95).unwrap();
        assert_eq!(dist.horizon(), 12);

        // Step 3 sits on the peak of the cycle, step 9 on the trough
        assert!(dist.mean[3] > dist.mean[9] + 4.0);
    }

    #[test]
    fn undifferenced_fit_has_no_constant() {
        let (endog, exog) = seasonal(144);
        let trained = SarimaModel::new(ModelOrder::new(1, 0, 0), SeasonalOrder::new(0, 0, 0, 12))
            .train(&endog, &exog)
            .unwrap();
        assert!(trained.intercept().is_none());
        assert_eq!(trained.ar_coefficients().len(), 1);
    }
}
