//! HistoTrack API - AWS Lambda Runtime

use lambda_http::{run, Error};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use histotrack_app::{build_cors_layer, create_app, with_http_layers};
use histotrack_common::config::Config;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .without_time()
        .init();

    info!("Initializing HistoTrack API Lambda");

    let config =
        Config::from_env().map_err(|e| Error::from(format!("Configuration error: {}", e)))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| Error::from(format!("Database error: {}", e)))?;

    info!("Database connection established");

    let app = create_app(&config, pool)
        .map_err(|e| Error::from(format!("App initialization error: {}", e)))?;

    let app = with_http_layers(
        app,
        build_cors_layer(config.cors_allowed_origins.as_deref()),
    );

    info!("HistoTrack API Lambda ready to serve requests");

    run(app).await
}
