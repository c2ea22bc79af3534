//! Transaction helpers for operations that write more than one table

use crate::domain::entities::LikeToggle;
use histotrack_common::{Error, RepositoryError, Result};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// Toggle `email`'s like on an artifact within an existing transaction.
///
/// Locks the artifact row first, so toggles on the same artifact run one at a
/// time. The counter moves only when the membership write changed a row.
pub async fn toggle_like_tx(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    artifact_id: Uuid,
) -> Result<LikeToggle> {
    let current: Option<i64> =
        sqlx::query_scalar("SELECT likes FROM artifacts WHERE id = $1 FOR UPDATE")
            .bind(artifact_id)
            .fetch_optional(&mut **tx)
            .await?;

    let Some(current) = current else {
        return Err(Error::NotFound("Artifact not found".to_string()));
    };

    let removed = sqlx::query("DELETE FROM liked_artifacts WHERE email = $1 AND artifact_id = $2")
        .bind(email)
        .bind(artifact_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    if removed > 0 {
        let likes: i64 = sqlx::query_scalar(
            "UPDATE artifacts SET likes = GREATEST(likes - 1, 0) WHERE id = $1 RETURNING likes",
        )
        .bind(artifact_id)
        .fetch_one(&mut **tx)
        .await?;

        return Ok(LikeToggle {
            liked: false,
            likes,
        });
    }

    let inserted = sqlx::query(
        "INSERT INTO liked_artifacts (email, artifact_id) VALUES ($1, $2) \
         ON CONFLICT (email, artifact_id) DO NOTHING",
    )
    .bind(email)
    .bind(artifact_id)
    .execute(&mut **tx)
    .await
    .map_err(RepositoryError::from_sqlx)?
    .rows_affected();

    if inserted == 0 {
        // Another writer already recorded this like
        return Ok(LikeToggle {
            liked: true,
            likes: current,
        });
    }

    let likes: i64 =
        sqlx::query_scalar("UPDATE artifacts SET likes = likes + 1 WHERE id = $1 RETURNING likes")
            .bind(artifact_id)
            .fetch_one(&mut **tx)
            .await?;

    Ok(LikeToggle { liked: true, likes })
}
