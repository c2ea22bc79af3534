//! Domain entities for the Artifacts domain
//!
//! An artifact is a catalog record with a handful of fixed fields and an open
//! set of descriptive fields supplied by the client. Fixed fields are columns;
//! descriptive fields live in a JSON object and are flattened on the wire.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use uuid::Uuid;
use validator::ValidationError;

use histotrack_auth::Owned;
use histotrack_common::{Error, Result};

/// Keys that are backed by columns and can never appear as descriptive fields
pub const RESERVED_FIELDS: &[&str] = &[
    "id",
    "_id",
    "name",
    "adderEmail",
    "likes",
    "createdAt",
    "updatedAt",
];

/// Descriptive fields of an artifact (period, origin, description, ...)
pub type Details = Map<String, Value>;

/// First reserved key used among the descriptive fields, if any
pub fn reserved_field(details: &Details) -> Option<&str> {
    details
        .keys()
        .map(String::as_str)
        .find(|key| RESERVED_FIELDS.contains(key))
}

/// `validator` hook for request DTOs carrying flattened descriptive fields
pub fn validate_details(details: &Details) -> std::result::Result<(), ValidationError> {
    match reserved_field(details) {
        Some(key) => {
            let mut err = ValidationError::new("reserved_field");
            err.message = Some(format!("field '{key}' cannot be set here").into());
            Err(err)
        }
        None => Ok(()),
    }
}

fn check_details(details: &Details) -> Result<()> {
    match reserved_field(details) {
        Some(key) => Err(Error::Validation(format!(
            "Field '{key}' cannot be set as a descriptive field"
        ))),
        None => Ok(()),
    }
}

/// Artifact entity: a cataloged object owned by the user who added it
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Artifact {
    pub id: Uuid,
    pub name: String,
    pub adder_email: String,
    pub likes: i64,
    pub details: Json<Details>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Artifact {
    /// Create a new artifact with a fresh id
    pub fn new(name: String, adder_email: String, likes: i64, details: Details) -> Result<Self> {
        let now = Utc::now();
        let artifact = Self {
            id: Uuid::new_v4(),
            name,
            adder_email,
            likes,
            details: Json(details),
            created_at: now,
            updated_at: now,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Only what storage depends on is checked; name and email are taken as sent
    pub fn validate(&self) -> Result<()> {
        if self.likes < 0 {
            return Err(Error::Validation("likes cannot be negative".to_string()));
        }

        check_details(&self.details)
    }
}

impl Owned for Artifact {
    #[mutants::skip] // Plain field accessor
    fn owner_email(&self) -> &str {
        &self.adder_email
    }
}

/// Partial update of an artifact's name and descriptive fields
///
/// Descriptive fields are merged key by key into the stored ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactPatch {
    pub name: Option<String>,
    pub details: Details,
}

impl ArtifactPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.details.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::Validation("No fields to update".to_string()));
        }
        check_details(&self.details)
    }
}

/// The set of artifacts a user has liked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikedArtifacts {
    pub email: String,
    pub artifact_ids: Vec<Uuid>,
}

impl LikedArtifacts {
    pub fn is_empty(&self) -> bool {
        self.artifact_ids.is_empty()
    }
}

/// Result of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    /// Whether the artifact is liked by the caller after the toggle
    pub liked: bool,
    /// Like count after the toggle
    pub likes: i64,
}

impl LikeToggle {
    pub fn message(&self) -> &'static str {
        if self.liked {
            "Artifact liked"
        } else {
            "Artifact disliked"
        }
    }
}
