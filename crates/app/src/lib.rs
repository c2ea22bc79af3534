//! HistoTrack application composition root
//!
//! Composes the domain routers and the shared HTTP middleware into a single
//! application served by both the local and the Lambda binaries.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use histotrack_artifacts::{ArtifactsRepositories, ArtifactsState};
use histotrack_auth::{AuthBackend, AuthConfig};
use histotrack_common::Config;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Largest accepted request body (1 MiB)
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router with all routes
pub fn create_app(config: &Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let auth = AuthBackend::from_config(&AuthConfig::from(config))?;

    let artifacts_state = ArtifactsState {
        repos: ArtifactsRepositories::new(pool),
        auth,
    };

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/", get(|| async { "My Histotrack Server is running!" }))
        .merge(histotrack_artifacts::routes().with_state(artifacts_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// CORS policy for a comma-separated origin list; permissive when unset
pub fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Wrap the router in tracing and CORS middleware, and cap the body size
/// body extractors will buffer at [`MAX_BODY_BYTES`]
pub fn with_http_layers(app: Router, cors: CorsLayer) -> Router {
    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .into_inner(),
    )
}
