//! # forecast_server
//!
//! HTTP front end for the crude oil forecasting pipeline. Each
//! `POST /forecast` call fits a fresh model on a blocking worker thread
//! and answers with an HTML table, or JSON when the client asks for it.

use axum::routing::{get, post};
use axum::Router;
use forecast_core::{ForecastEngine, SeriesStore};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod render;
pub mod routes;

pub use crate::config::ServerArgs;
pub use crate::error::ApiError;

/// Engine over any series store
pub type SharedEngine = ForecastEngine<Arc<dyn SeriesStore>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SharedEngine>,
    /// Fits running longer than this are abandoned
    pub fit_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(engine: SharedEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            fit_timeout: None,
        }
    }

    pub fn with_fit_timeout(mut self, fit_timeout: Option<Duration>) -> Self {
        self.fit_timeout = fit_timeout;
        self
    }
}

/// Build the router with tracing and CORS layers
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::liveness))
        .route("/forecast", post(routes::forecast))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
