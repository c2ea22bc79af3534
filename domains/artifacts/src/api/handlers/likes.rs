//! Like toggling and liked-artifact listing handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use histotrack_auth::AuthUser;
use histotrack_common::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::artifacts::ArtifactResponse;
use crate::api::middleware::ArtifactsState;
use crate::domain::entities::LikeToggle;

/// Query parameters for listing liked artifacts
#[derive(Debug, Default, Deserialize)]
pub struct LikedArtifactsQuery {
    /// Must be the caller's own email when given
    pub email: Option<String>,
}

/// Outcome of a like toggle
#[derive(Debug, Serialize)]
pub struct ToggleLikeResponse {
    pub liked: bool,
    pub message: String,
    pub likes: i64,
}

impl From<LikeToggle> for ToggleLikeResponse {
    fn from(toggle: LikeToggle) -> Self {
        Self {
            liked: toggle.liked,
            message: toggle.message().to_string(),
            likes: toggle.likes,
        }
    }
}

/// Like or unlike an artifact for the caller
pub async fn toggle_like(
    AuthUser(ctx): AuthUser,
    State(state): State<ArtifactsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleLikeResponse>> {
    let toggle = state.repos.likes.toggle(ctx.email(), id).await?;
    Ok(Json(toggle.into()))
}

/// List the artifacts the caller has liked
pub async fn list_liked_artifacts(
    AuthUser(ctx): AuthUser,
    State(state): State<ArtifactsState>,
    Query(params): Query<LikedArtifactsQuery>,
) -> Result<Json<Vec<ArtifactResponse>>> {
    if let Some(email) = params.email.as_deref().filter(|e| !e.is_empty()) {
        ctx.ensure_email(email)?;
    }

    let liked = state.repos.likes.find(ctx.email()).await?;
    if liked.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let artifacts = state
        .repos
        .artifacts
        .find_many(&liked.artifact_ids)
        .await?;

    let responses: Vec<ArtifactResponse> = artifacts.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}
