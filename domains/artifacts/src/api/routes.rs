//! Route definitions for Artifacts domain API

use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers::{artifacts, likes};
use super::middleware::ArtifactsState;

/// Create artifact catalog routes
fn artifact_routes() -> Router<ArtifactsState> {
    Router::new()
        .route(
            "/artifacts",
            get(artifacts::list_artifacts).post(artifacts::create_artifact),
        )
        .route(
            "/artifacts/{id}",
            get(artifacts::get_artifact)
                .patch(artifacts::update_artifact)
                .delete(artifacts::delete_artifact),
        )
}

/// Create like routes
fn like_routes() -> Router<ArtifactsState> {
    Router::new()
        .route("/artifacts/toggle-like/{id}", patch(likes::toggle_like))
        .route("/liked-artifacts", get(likes::list_liked_artifacts))
}

/// Create all Artifacts domain API routes
pub fn routes() -> Router<ArtifactsState> {
    Router::new().merge(artifact_routes()).merge(like_routes())
}
