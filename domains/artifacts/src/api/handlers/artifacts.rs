//! Artifact catalog API handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use histotrack_auth::{AuthError, AuthUser};
use histotrack_common::{Error, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::ArtifactsState;
use crate::domain::entities::{validate_details, Artifact, ArtifactPatch, Details};
use crate::domain::listing::ArtifactListing;

/// Query parameters for listing artifacts
#[derive(Debug, Default, Deserialize)]
pub struct ListArtifactsQuery {
    pub search: Option<String>,
    pub email: Option<String>,
    /// Kept as text so a malformed limit reads as "no limit"
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// Request for creating an artifact
///
/// Any field besides the named ones is kept as a descriptive field. Name and
/// adder email are stored as sent.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtifactRequest {
    pub name: String,

    /// Defaults to the caller's email
    pub adder_email: Option<String>,

    #[validate(range(min = 0))]
    pub likes: Option<i64>,

    #[serde(flatten)]
    #[validate(custom(function = "validate_details"))]
    pub details: Details,
}

/// Request for updating an artifact's name and descriptive fields
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtifactRequest {
    pub name: Option<String>,

    #[serde(flatten)]
    #[validate(custom(function = "validate_details"))]
    pub details: Details,
}

impl From<UpdateArtifactRequest> for ArtifactPatch {
    fn from(req: UpdateArtifactRequest) -> Self {
        Self {
            name: req.name,
            details: req.details,
        }
    }
}

/// Artifact response DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactResponse {
    pub id: Uuid,
    pub name: String,
    pub adder_email: String,
    pub likes: i64,
    #[serde(flatten)]
    pub details: Details,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Artifact> for ArtifactResponse {
    fn from(a: Artifact) -> Self {
        Self {
            id: a.id,
            name: a.name,
            adder_email: a.adder_email,
            likes: a.likes,
            details: a.details.0,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// List, search, or filter artifacts
///
/// Filtering by `email` requires the caller to be that user.
pub async fn list_artifacts(
    user: Option<AuthUser>,
    State(state): State<ArtifactsState>,
    Query(params): Query<ListArtifactsQuery>,
) -> Result<Json<Vec<ArtifactResponse>>> {
    let listing = ArtifactListing::from_params(
        params.search.as_deref(),
        params.email.as_deref(),
        params.sort.as_deref(),
        params.limit.as_deref(),
    );

    if let Some(email) = listing.requested_email() {
        let AuthUser(ctx) = user.ok_or(AuthError::MissingAuthorization)?;
        ctx.ensure_email(email)?;
    }

    let artifacts = state.repos.artifacts.list(&listing).await?;

    let responses: Vec<ArtifactResponse> = artifacts.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Get a single artifact by ID, `null` when it does not exist
pub async fn get_artifact(
    State(state): State<ArtifactsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<ArtifactResponse>>> {
    let artifact = state.repos.artifacts.find(id).await?;
    Ok(Json(artifact.map(Into::into)))
}

/// Create an artifact
pub async fn create_artifact(
    AuthUser(ctx): AuthUser,
    State(state): State<ArtifactsState>,
    ValidatedJson(req): ValidatedJson<CreateArtifactRequest>,
) -> Result<(StatusCode, Json<ArtifactResponse>)> {
    let adder_email = req.adder_email.unwrap_or_else(|| ctx.email().to_string());

    let artifact = Artifact::new(req.name, adder_email, req.likes.unwrap_or(0), req.details)?;

    let created = state.repos.artifacts.create(&artifact).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Update an artifact owned by the caller
///
/// Ownership is settled before the body is looked at, so a non-owner gets 403
/// whatever they send. A missing artifact yields `null`.
pub async fn update_artifact(
    AuthUser(ctx): AuthUser,
    State(state): State<ArtifactsState>,
    Path(id): Path<Uuid>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Option<ArtifactResponse>>> {
    let Some(artifact) = state.repos.artifacts.find(id).await? else {
        return Ok(Json(None));
    };
    ctx.authorize_owner(&artifact)?;

    let Json(body) = body.map_err(Error::from_json_rejection)?;
    let ValidatedJson(req) = ValidatedJson::<UpdateArtifactRequest>::from_value(body)?;

    let patch = ArtifactPatch::from(req);
    patch.validate()?;

    let updated = state.repos.artifacts.update(id, ctx.email(), &patch).await?;
    Ok(Json(updated.map(Into::into)))
}

/// Delete an artifact owned by the caller
///
/// 204 on success; a missing artifact yields `null` with 200.
pub async fn delete_artifact(
    AuthUser(ctx): AuthUser,
    State(state): State<ArtifactsState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let Some(artifact) = state.repos.artifacts.find(id).await? else {
        return Ok(Json(Value::Null).into_response());
    };
    ctx.authorize_owner(&artifact)?;

    if !state.repos.artifacts.delete(id, ctx.email()).await? {
        return Ok(Json(Value::Null).into_response());
    }

    tracing::info!(artifact_id = %id, email = %ctx.email(), "Artifact deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
