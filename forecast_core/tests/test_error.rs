use forecast_core::error::{ErrorKind, ForecastError};
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);

    match forecast_error {
        ForecastError::Io(_) => {}
        _ => panic!("Expected Io variant"),
    }
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidParameter("steps must be at least 1".to_string());
    assert_eq!(error.to_string(), "Invalid parameter: steps must be at least 1");

    let error = ForecastError::data_unavailable("endogenous_raw", "no such file");
    assert_eq!(
        error.to_string(),
        "Data unavailable for endogenous_raw: no such file"
    );

    let error = ForecastError::FitFailure("optimizer did not converge".to_string());
    assert!(error.to_string().contains("optimizer did not converge"));
}

#[test]
fn test_error_kinds() {
    let cases = [
        (ForecastError::InvalidParameter("x".into()), ErrorKind::InvalidParameter),
        (ForecastError::data_unavailable("x", "y"), ErrorKind::DataUnavailable),
        (ForecastError::FitFailure("x".into()), ErrorKind::FitFailure),
        (ForecastError::Config("x".into()), ErrorKind::Config),
    ];
    for (error, kind) in cases {
        assert_eq!(error.kind(), kind);
    }
}
