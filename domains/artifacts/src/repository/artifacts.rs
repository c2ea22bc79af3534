//! Artifact repository

use crate::domain::entities::{Artifact, ArtifactPatch};
use crate::domain::listing::{escape_like, ArtifactFilter, ArtifactListing, SortKey};
use histotrack_common::{RepositoryError, Result};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// All columns in the artifacts table, used for SELECT and RETURNING clauses.
pub(crate) const ARTIFACT_COLUMNS: &str =
    "id, name, adder_email, likes, details, created_at, updated_at";

/// Append filter, ordering and limit for a listing
pub(crate) fn push_listing(qb: &mut QueryBuilder<'_, Postgres>, listing: &ArtifactListing) {
    match &listing.filter {
        ArtifactFilter::All => {}
        ArtifactFilter::NameContains(text) => {
            qb.push(" WHERE name ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(text)));
        }
        ArtifactFilter::AdderEmail(email) => {
            qb.push(" WHERE adder_email = ");
            qb.push_bind(email.clone());
        }
    }

    match &listing.sort {
        Some(SortKey::Column(column)) => {
            qb.push(format!(" ORDER BY {column} DESC, id DESC"));
        }
        Some(SortKey::Detail(field)) => {
            qb.push(" ORDER BY details -> ");
            qb.push_bind(field.clone());
            qb.push(" DESC NULLS LAST, id DESC");
        }
        None => {
            qb.push(" ORDER BY created_at DESC, id DESC");
        }
    }

    if let Some(limit) = listing.limit {
        qb.push(" LIMIT ");
        qb.push_bind(limit);
    }
}

#[derive(Clone)]
pub struct ArtifactRepository {
    pool: PgPool,
}

impl ArtifactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find artifact by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Artifact>> {
        let query = format!("SELECT {ARTIFACT_COLUMNS} FROM artifacts WHERE id = $1");
        let artifact = sqlx::query_as::<_, Artifact>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(artifact)
    }

    /// List artifacts matching a listing request
    pub async fn list(&self, listing: &ArtifactListing) -> Result<Vec<Artifact>> {
        let mut qb = QueryBuilder::new(format!("SELECT {ARTIFACT_COLUMNS} FROM artifacts"));
        push_listing(&mut qb, listing);

        let artifacts = qb
            .build_query_as::<Artifact>()
            .fetch_all(&self.pool)
            .await?;

        Ok(artifacts)
    }

    /// Fetch every artifact whose id is in `ids`, newest first
    ///
    /// Ids without a matching artifact are skipped.
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Artifact>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {ARTIFACT_COLUMNS} FROM artifacts \
             WHERE id = ANY($1) ORDER BY created_at DESC, id DESC"
        );
        let artifacts = sqlx::query_as::<_, Artifact>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(artifacts)
    }

    /// Create a new artifact
    pub async fn create(&self, artifact: &Artifact) -> Result<Artifact> {
        let query = format!(
            "INSERT INTO artifacts ({ARTIFACT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ARTIFACT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Artifact>(&query)
            .bind(artifact.id)
            .bind(&artifact.name)
            .bind(&artifact.adder_email)
            .bind(artifact.likes)
            .bind(&artifact.details)
            .bind(artifact.created_at)
            .bind(artifact.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from_sqlx)?;

        tracing::info!(artifact_id = %created.id, adder_email = %created.adder_email, "Artifact created");
        Ok(created)
    }

    /// Merge a patch into an artifact owned by `owner_email`
    ///
    /// Returns `None` when no artifact with that id and owner exists.
    pub async fn update(
        &self,
        id: Uuid,
        owner_email: &str,
        patch: &ArtifactPatch,
    ) -> Result<Option<Artifact>> {
        let query = format!(
            "UPDATE artifacts SET \
                name = COALESCE($3, name), \
                details = details || $4, \
                updated_at = NOW() \
             WHERE id = $1 AND adder_email = $2 \
             RETURNING {ARTIFACT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Artifact>(&query)
            .bind(id)
            .bind(owner_email)
            .bind(patch.name.as_deref())
            .bind(Json(&patch.details))
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from_sqlx)?;

        Ok(updated)
    }

    /// Delete an artifact owned by `owner_email`; its likes go with it
    pub async fn delete(&self, id: Uuid, owner_email: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM artifacts WHERE id = $1 AND adder_email = $2")
            .bind(id)
            .bind(owner_email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
