//! Repository implementations for Artifacts domain

pub mod artifacts;
pub mod likes;
pub mod transactions;

use sqlx::{PgPool, Postgres, Transaction};

pub use artifacts::ArtifactRepository;
pub use likes::LikedArtifactsRepository;
pub use transactions::toggle_like_tx;

/// Combined repository access for the Artifacts domain
#[derive(Clone)]
pub struct ArtifactsRepositories {
    pool: PgPool,
    pub artifacts: ArtifactRepository,
    pub likes: LikedArtifactsRepository,
}

impl ArtifactsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            artifacts: ArtifactRepository::new(pool.clone()),
            likes: LikedArtifactsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a new database transaction.
    pub async fn begin(&self) -> std::result::Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}
