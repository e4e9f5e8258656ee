use approx::assert_abs_diff_eq;
use forecast_core::data::TimeSeries;
use forecast_core::models::{
    ArimaModel, ForecastModel, ModelOrder, SarimaModel, SeasonalOrder, TrainedForecastModel,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rstest::rstest;

/// Uniform noise in [-0.5, 0.5) from a seeded generator
fn noise(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen::<f64>() - 0.5).collect()
}

fn create_test_data(n: usize) -> (TimeSeries, TimeSeries) {
    let exog: Vec<f64> = noise(n, 7)
        .iter()
        .enumerate()
        .map(|(i, e)| 80.0 + 5.0 * (i as f64 * 0.3).sin() + 0.5 * e)
        .collect();
    let endog: Vec<f64> = noise(n, 11)
        .iter()
        .enumerate()
        .map(|(i, e)| 60.0 + 0.05 * i as f64 + 0.3 * exog[i] + e)
        .collect();
    (TimeSeries::new(endog).unwrap(), TimeSeries::new(exog).unwrap())
}

#[rstest]
#[case(ModelOrder::new(1, 0, 0))]
#[case(ModelOrder::new(0, 1, 1))]
#[case(ModelOrder::new(1, 1, 1))]
#[case(ModelOrder::new(2, 0, 1))]
fn test_arima_orders_fit_and_forecast(#[case] order: ModelOrder) {
    let (endog, exog) = create_test_data(150);
    let trained = ArimaModel::new(order).train(&endog, &exog).unwrap();

    let dist = trained.forecast(&[80.0; 6], 0.95).unwrap();
    assert_eq!(dist.horizon(), 6);
    for i in 0..6 {
        assert!(dist.mean[i].is_finite());
        assert!(dist.lower[i] <= dist.mean[i] && dist.mean[i] <= dist.upper[i]);
    }
}

#[test]
fn test_fitting_is_deterministic() {
    let (endog, exog) = create_test_data(120);
    let model = ArimaModel::new(ModelOrder::new(1, 1, 1));

    let first = model.train(&endog, &exog).unwrap().forecast(&[80.0, 81.0], 0.95).unwrap();
    let second = model.train(&endog, &exog).unwrap().forecast(&[80.0, 81.0], 0.95).unwrap();
    for i in 0..2 {
        assert_abs_diff_eq!(first.mean[i], second.mean[i], epsilon = 1e-12);
        assert_abs_diff_eq!(first.upper[i], second.upper[i], epsilon = 1e-12);
    }
}

#[test]
fn test_interval_width_follows_confidence_level() {
    let (endog, exog) = create_test_data(120);
    let trained = ArimaModel::new(ModelOrder::new(1, 0, 0)).train(&endog, &exog).unwrap();

    let narrow = trained.forecast(&[80.0], 0.80).unwrap();
    let wide = trained.forecast(&[80.0], 0.99).unwrap();
    assert_abs_diff_eq!(narrow.mean[0], wide.mean[0], epsilon = 1e-12);
    assert!(wide.upper[0] - wide.lower[0] > narrow.upper[0] - narrow.lower[0]);

    assert!(trained.forecast(&[80.0], 1.0).is_err());
    assert!(trained.forecast(&[], 0.95).is_err());
}

#[test]
fn test_exogenous_values_drive_the_forecast() {
    let (endog, exog) = create_test_data(200);
    let trained = ArimaModel::new(ModelOrder::new(1, 0, 0)).train(&endog, &exog).unwrap();

    let low = trained.forecast(&[70.0], 0.95).unwrap();
    let high = trained.forecast(&[90.0], 0.95).unwrap();
    // The regressor enters with a positive coefficient of about 0.3
    assert!(high.mean[0] - low.mean[0] > 3.0);
}

#[test]
fn test_sarima_fits_with_seasonal_terms() {
    let (endog, exog) = create_test_data(200);
    let model = SarimaModel::new(ModelOrder::new(1, 1, 1), SeasonalOrder::new(1, 0, 1, 12));
    let trained = model.train(&endog, &exog).unwrap();

    assert_eq!(trained.seasonal_ar_coefficients().len(), 1);
    assert_eq!(trained.seasonal_ma_coefficients().len(), 1);
    let dist = trained.forecast(&[80.0; 12], 0.95).unwrap();
    assert_eq!(dist.horizon(), 12);
}

#[test]
fn test_model_parameter_validation() {
    assert!(ModelOrder::from_signed(-1, 0, 1).is_err());
    assert!(SeasonalOrder::from_signed(1, 0, 1, -12).is_err());

    let (endog, exog) = create_test_data(20);
    assert!(ArimaModel::new(ModelOrder::new(50, 1, 50)).train(&endog, &exog).is_err());
}
