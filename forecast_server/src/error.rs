//! Mapping of pipeline failures onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use forecast_core::ForecastError;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

/// Failure while serving a forecast request
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("fit did not finish within {0:?}")]
    Timeout(Duration),

    #[error("forecast task aborted: {0}")]
    Task(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Forecast(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the caller
    pub fn detail(&self) -> String {
        if self.status_code() == StatusCode::BAD_REQUEST {
            self.to_string()
        } else {
            format!("Error in forecast generation: {}", self)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.detail();
        if status.is_server_error() {
            error!(status = status.as_u16(), %detail, "forecast request failed");
        }

        (
            status,
            Json(serde_json::json!({
                "detail": detail,
                "status": status.as_u16(),
            })),
        )
            .into_response()
    }
}
