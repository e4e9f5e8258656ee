//! ARIMA model with an exogenous regressor

use crate::data::TimeSeries;
use crate::error::Result;
use crate::models::{FitOptions, FittedModel, ForecastModel, ModelOrder, SeasonalOrder};

/// ARIMA model (AutoRegressive Integrated Moving Average)
///
/// Expects series whose seasonal component has already been removed.
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    order: ModelOrder,
    options: FitOptions,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(order: ModelOrder) -> Self {
        Self {
            name: format!("ARIMA({},{},{})", order.p, order.d, order.q),
            order,
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
}

impl ForecastModel for ArimaModel {
    type Trained = FittedModel;

    fn train(&self, endog: &TimeSeries, exog: &TimeSeries) -> Result<FittedModel> {
        FittedModel::fit(
            self.name.clone(),
            endog.values(),
            exog.values(),
            self.order,
            SeasonalOrder::none(),
            self.order.d == 0,
            &self.options,
        )
    }

    fn name(&self) -> &str {
        &self.name
    }
}
