//! Regression with seasonal ARIMA errors
//!
//! The endogenous series is modelled as
//!
//! ```text
//! y_t = c + beta * x_t + u_t,   phi(L) PHI(L^m) delta(L) u_t = theta(L) THETA(L^m) e_t
//! ```
//!
//! where `delta(L) = (1 - L)^d (1 - L^m)^D`. Both series are differenced with
//! `delta`, the coefficients are estimated by minimising the conditional sum
//! of squared innovations, and forecast variances come from the psi-weights of
//! the integrated model. The constant `c` is only estimated when no
//! differencing is applied.

use crate::error::{ForecastError, Result};
use crate::models::polynomial;
use crate::models::{
    FitOptions, ForecastDistribution, ModelOrder, SeasonalOrder, TrainedForecastModel,
};
use crate::optimization::{minimize, SimplexConfig};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

/// Coefficients are kept inside this range during estimation
const COEFFICIENT_BOUND: f64 = 0.99;

/// Position of each coefficient group in the parameter vector
#[derive(Debug, Clone, Copy)]
struct Layout {
    intercept: bool,
    p: usize,
    seasonal_p: usize,
    q: usize,
    seasonal_q: usize,
    period: usize,
}

impl Layout {
    fn len(&self) -> usize {
        usize::from(self.intercept) + 1 + self.p + self.seasonal_p + self.q + self.seasonal_q
    }

    fn ar_span(&self) -> usize {
        self.p + self.seasonal_p * self.period
    }

    fn split<'a>(&self, params: &'a [f64]) -> Coefficients<'a> {
        let (intercept, rest) = if self.intercept {
            (params[0], &params[1..])
        } else {
            (0.0, params)
        };
        let (exog, rest) = (rest[0], &rest[1..]);
        let (ar, rest) = rest.split_at(self.p);
        let (seasonal_ar, rest) = rest.split_at(self.seasonal_p);
        let (ma, seasonal_ma) = rest.split_at(self.q);
        Coefficients {
            intercept,
            exog,
            ar,
            seasonal_ar,
            ma,
            seasonal_ma,
        }
    }
}

struct Coefficients<'a> {
    intercept: f64,
    exog: f64,
    ar: &'a [f64],
    seasonal_ar: &'a [f64],
    ma: &'a [f64],
    seasonal_ma: &'a [f64],
}

impl Coefficients<'_> {
    fn ar_polynomial(&self, period: usize) -> Vec<f64> {
        polynomial::multiply(
            &polynomial::autoregressive(self.ar, 1),
            &polynomial::autoregressive(self.seasonal_ar, period),
        )
    }

    fn ma_polynomial(&self, period: usize) -> Vec<f64> {
        polynomial::multiply(
            &polynomial::moving_average(self.ma, 1),
            &polynomial::moving_average(self.seasonal_ma, period),
        )
    }

    /// Regression errors `z_t - c - beta * x_t` on the differenced scale
    fn regression_errors(&self, endog: &[f64], exog: &[f64]) -> Vec<f64> {
        endog
            .iter()
            .zip(exog)
            .map(|(z, x)| z - self.intercept - self.exog * x)
            .collect()
    }
}

/// Innovations of an ARMA process given its regression errors.
///
/// Innovations before `start` are taken as zero.
fn innovations(ar: &[f64], ma: &[f64], errors: &[f64], start: usize) -> Vec<f64> {
    let mut e = vec![0.0; errors.len()];
    for t in start..errors.len() {
        let filtered: f64 = ar.iter().enumerate().map(|(k, c)| c * errors[t - k]).sum();
        let shocks: f64 = ma
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(k, _)| *k <= t)
            .map(|(k, c)| c * e[t - k])
            .sum();
        e[t] = filtered - shocks;
    }
    e
}

/// Observations consumed by differencing and lag spans plus one per
/// parameter, or `None` when the order overflows
fn required_observations(
    order: ModelOrder,
    seasonal: SeasonalOrder,
    period: usize,
    constant: bool,
) -> Option<usize> {
    let lost = order.d.checked_add(seasonal.d.checked_mul(period)?)?;
    let ar_span = order.p.checked_add(seasonal.p.checked_mul(period)?)?;
    let ma_span = order.q.checked_add(seasonal.q.checked_mul(period)?)?;
    let params = (1 + usize::from(constant))
        .checked_add(order.p)?
        .checked_add(order.q)?
        .checked_add(seasonal.p)?
        .checked_add(seasonal.q)?;
    lost.checked_add(ar_span)?
        .checked_add(ma_span)?
        .checked_add(params)
}

fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

/// Least-squares start values for the constant and the regressor coefficient
fn regression_start(endog: &[f64], exog: &[f64], intercept: bool) -> (f64, f64) {
    let n = endog.len() as f64;
    if intercept {
        let mean_y = endog.iter().sum::<f64>() / n;
        let mean_x = exog.iter().sum::<f64>() / n;
        let sxy: f64 = endog
            .iter()
            .zip(exog)
            .map(|(y, x)| (y - mean_y) * (x - mean_x))
            .sum();
        let sxx: f64 = exog.iter().map(|x| (x - mean_x).powi(2)).sum();
        let beta = if sxx > f64::EPSILON { sxy / sxx } else { 0.0 };
        (mean_y - beta * mean_x, beta)
    } else {
        let sxy: f64 = endog.iter().zip(exog).map(|(y, x)| y * x).sum();
        let sxx: f64 = exog.iter().map(|x| x * x).sum();
        let beta = if sxx > f64::EPSILON { sxy / sxx } else { 0.0 };
        (0.0, beta)
    }
}

/// A model fitted to one endogenous series and its regressor
///
/// Holds the estimated coefficients together with the data needed to extend
/// the series into the future.
#[derive(Debug, Clone)]
pub struct FittedModel {
    name: String,
    order: ModelOrder,
    seasonal: SeasonalOrder,
    params: Vec<f64>,
    layout: Layout,
    differencing: Vec<f64>,
    ar: Vec<f64>,
    ma: Vec<f64>,
    endog: Vec<f64>,
    exog: Vec<f64>,
    errors: Vec<f64>,
    innovations: Vec<f64>,
    sigma2: f64,
    aic: f64,
    iterations: usize,
}

impl FittedModel {
    /// Estimate the model on the given data.
    ///
    /// `constant` adds an intercept to the regression; it is ignored once any
    /// differencing is applied. Fails with [`ForecastError::FitFailure`] when
    /// the series are misaligned, the order cannot be supported by the series
    /// length, or the optimizer does not converge.
    pub fn fit(
        name: String,
        endog: &[f64],
        exog: &[f64],
        order: ModelOrder,
        seasonal: SeasonalOrder,
        constant: bool,
        options: &FitOptions,
    ) -> Result<Self> {
        if endog.len() != exog.len() {
            return Err(ForecastError::FitFailure(format!(
                "endogenous series has {} observations but exogenous series has {}",
                endog.len(),
                exog.len()
            )));
        }
        if seasonal.is_active() && seasonal.period < 2 {
            return Err(ForecastError::FitFailure(format!(
                "seasonal period must be at least 2 when seasonal terms are present, got {}",
                seasonal.period
            )));
        }
        let period = if seasonal.is_active() { seasonal.period } else { 0 };

        // Checked before any polynomial is allocated
        let required = required_observations(order, seasonal, period, constant);
        if required.map_or(true, |needed| needed >= endog.len()) {
            return Err(ForecastError::FitFailure(format!(
                "{} needs more observations than the {} available",
                name,
                endog.len()
            )));
        }

        let differencing = polynomial::differencing(order.d, seasonal.d, period);
        let layout = Layout {
            intercept: constant && order.d + seasonal.d == 0,
            p: order.p,
            seasonal_p: seasonal.p,
            q: order.q,
            seasonal_q: seasonal.q,
            period,
        };

        let z = polynomial::apply(&differencing, endog);
        let x = polynomial::apply(&differencing, exog);
        let start = layout.ar_span();

        let (intercept, beta) = regression_start(&z, &x, layout.intercept);
        let mut initial = Vec::with_capacity(layout.len());
        if layout.intercept {
            initial.push(intercept);
        }
        initial.push(beta);
        initial.extend((0..layout.p).map(|i| 0.1 / (i + 1) as f64));
        initial.extend((0..layout.seasonal_p).map(|i| 0.1 / (i + 1) as f64));
        initial.extend(std::iter::repeat(0.0).take(layout.q + layout.seasonal_q));

        let free = usize::from(layout.intercept) + 1;
        let bounds: Vec<(f64, f64)> = (0..layout.len())
            .map(|i| {
                if i < free {
                    (f64::NEG_INFINITY, f64::INFINITY)
                } else {
                    (-COEFFICIENT_BOUND, COEFFICIENT_BOUND)
                }
            })
            .collect();

        let config = SimplexConfig {
            max_iter: options.max_iterations_per_param * layout.len(),
            tolerance: options.tolerance,
            ..SimplexConfig::default()
        };

        let objective = |params: &[f64]| {
            let c = layout.split(params);
            let errors = c.regression_errors(&z, &x);
            let e = innovations(&c.ar_polynomial(period), &c.ma_polynomial(period), &errors, start);
            sum_of_squares(&e[start..])
        };
        let minimum = minimize(objective, &initial, &bounds, &config);

        debug!(
            model = %name,
            iterations = minimum.iterations,
            converged = minimum.converged,
            css = minimum.value,
            "coefficient search finished"
        );

        if !minimum.value.is_finite() {
            return Err(ForecastError::FitFailure(format!(
                "{}: objective is not finite at any trial point",
                name
            )));
        }
        if !minimum.converged {
            return Err(ForecastError::FitFailure(format!(
                "{}: optimizer did not converge within {} iterations",
                name, minimum.iterations
            )));
        }

        let params = minimum.point;
        let c = layout.split(&params);
        let ar = c.ar_polynomial(period);
        let ma = c.ma_polynomial(period);
        let errors = c.regression_errors(&z, &x);
        let innovations = innovations(&ar, &ma, &errors, start);

        let n_residuals = (z.len() - start) as f64;
        let sigma2 = sum_of_squares(&innovations[start..]) / n_residuals;
        if !sigma2.is_finite() {
            return Err(ForecastError::FitFailure(format!(
                "{}: residual variance is not finite",
                name
            )));
        }
        let log_sigma2 = sigma2.max(f64::MIN_POSITIVE).ln();
        let log_likelihood =
            -0.5 * n_residuals * (1.0 + log_sigma2 + (2.0 * std::f64::consts::PI).ln());
        let aic = -2.0 * log_likelihood + 2.0 * (layout.len() + 1) as f64;

        Ok(Self {
            name,
            order,
            seasonal,
            params,
            layout,
            differencing,
            ar,
            ma,
            endog: endog.to_vec(),
            exog: exog.to_vec(),
            errors,
            innovations,
            sigma2,
            aic,
            iterations: minimum.iterations,
        })
    }

    pub fn order(&self) -> ModelOrder {
        self.order
    }

    pub fn seasonal_order(&self) -> SeasonalOrder {
        self.seasonal
    }

    /// Constant term, present only for undifferenced models
    pub fn intercept(&self) -> Option<f64> {
        self.layout
            .intercept
            .then(|| self.layout.split(&self.params).intercept)
    }

    /// Coefficient of the exogenous regressor
    pub fn exog_coefficient(&self) -> f64 {
        self.layout.split(&self.params).exog
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        self.layout.split(&self.params).ar
    }

    pub fn seasonal_ar_coefficients(&self) -> &[f64] {
        self.layout.split(&self.params).seasonal_ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        self.layout.split(&self.params).ma
    }

    pub fn seasonal_ma_coefficients(&self) -> &[f64] {
        self.layout.split(&self.params).seasonal_ma
    }

    /// Innovation variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Akaike information criterion of the conditional likelihood
    pub fn aic(&self) -> f64 {
        self.aic
    }

    /// Optimizer iterations used
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl TrainedForecastModel for FittedModel {
    fn forecast(
        &self,
        future_exog: &[f64],
        confidence_level: f64,
    ) -> Result<ForecastDistribution> {
        let horizon = future_exog.len();
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "at least one future exogenous value is required".to_string(),
            ));
        }
        if future_exog.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "future exogenous values must be finite".to_string(),
            ));
        }
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence level must be between 0 and 1, got {}",
                confidence_level
            )));
        }

        let c = self.layout.split(&self.params);

        let mut exog = self.exog.clone();
        exog.extend_from_slice(future_exog);
        let x = polynomial::apply(&self.differencing, &exog);
        let future_x = &x[x.len() - horizon..];

        let mut errors = self.errors.clone();
        let mut shocks = self.innovations.clone();
        let mut transformed = Vec::with_capacity(horizon);
        for x_t in future_x {
            let t = errors.len();
            let ar_part: f64 = self
                .ar
                .iter()
                .enumerate()
                .skip(1)
                .filter(|(k, _)| *k <= t)
                .map(|(k, coef)| -coef * errors[t - k])
                .sum();
            let ma_part: f64 = self
                .ma
                .iter()
                .enumerate()
                .skip(1)
                .filter(|(k, _)| *k <= t)
                .map(|(k, coef)| coef * shocks[t - k])
                .sum();
            let error = ar_part + ma_part;
            errors.push(error);
            shocks.push(0.0);
            transformed.push(error + c.intercept + c.exog * x_t);
        }

        let mean = polynomial::integrate(&self.differencing, &self.endog, &transformed);

        let integrated_ar = polynomial::multiply(&self.ar, &self.differencing);
        let psi = polynomial::psi_weights(&integrated_ar, &self.ma, horizon);
        let normal = Normal::new(0.0, 1.0)
            .map_err(|err| ForecastError::FitFailure(format!("normal distribution: {}", err)))?;
        let z = normal.inverse_cdf((1.0 + confidence_level) / 2.0);

        let mut cumulative = 0.0;
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (step, (m, weight)) in mean.iter().zip(&psi).enumerate() {
            cumulative += weight * weight;
            let se = (self.sigma2 * cumulative).sqrt();
            if !m.is_finite() || !se.is_finite() {
                return Err(ForecastError::FitFailure(format!(
                    "{}: forecast at step {} is not finite",
                    self.name,
                    step + 1
                )));
            }
            lower.push(m - z * se);
            upper.push(m + z * se);
        }

        Ok(ForecastDistribution {
            mean,
            lower,
            upper,
            confidence_level,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
