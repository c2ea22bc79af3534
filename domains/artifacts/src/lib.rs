//! Artifacts domain: catalog records and the likes users give them

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Artifact, ArtifactPatch, Details, LikeToggle, LikedArtifacts};
pub use domain::listing::{ArtifactFilter, ArtifactListing, SortKey};

// Re-export repository types
pub use repository::{
    toggle_like_tx, ArtifactRepository, ArtifactsRepositories, LikedArtifactsRepository,
};

// Re-export API types
pub use api::routes;
pub use api::ArtifactsState;
