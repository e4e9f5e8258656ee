//! forecast-server binary

use clap::Parser;
use forecast_core::{FileSeriesStore, ForecastEngine, SeriesStore};
use forecast_server::{app, AppState, ServerArgs};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "forecast_server=info,forecast_core=info,tower_http=info".into()
            }),
        )
        .init();

    let args = ServerArgs::parse();
    let store: Arc<dyn SeriesStore> = Arc::new(FileSeriesStore::new(args.store_config()));
    let engine = ForecastEngine::new(store, args.engine_config())?;
    let state = AppState::new(engine).with_fit_timeout(args.fit_timeout());

    let addr = args.socket_addr()?;
    tracing::info!(
        data_dir = %args.data_dir.display(),
        anchor_date = %args.anchor_date,
        "forecast-server v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
