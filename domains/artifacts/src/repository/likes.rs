//! Liked-artifacts repository

use crate::domain::entities::{LikeToggle, LikedArtifacts};
use crate::repository::transactions::toggle_like_tx;
use histotrack_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct LikedArtifactsRepository {
    pool: PgPool,
}

impl LikedArtifactsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The set of artifacts `email` has liked, oldest like first
    ///
    /// A user who never liked anything has an empty set.
    pub async fn find(&self, email: &str) -> Result<LikedArtifacts> {
        let artifact_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT artifact_id FROM liked_artifacts \
             WHERE email = $1 ORDER BY created_at, artifact_id",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(LikedArtifacts {
            email: email.to_string(),
            artifact_ids,
        })
    }

    /// Like the artifact if `email` has not liked it yet, otherwise unlike it
    pub async fn toggle(&self, email: &str, artifact_id: Uuid) -> Result<LikeToggle> {
        let mut tx = self.pool.begin().await?;
        let toggle = toggle_like_tx(&mut tx, email, artifact_id).await?;
        tx.commit().await?;

        tracing::info!(
            artifact_id = %artifact_id,
            email = %email,
            liked = toggle.liked,
            likes = toggle.likes,
            "Artifact like toggled"
        );
        Ok(toggle)
    }
}
