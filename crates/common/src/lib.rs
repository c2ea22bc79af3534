//! Shared utilities, configuration, and error handling for HistoTrack
//!
//! This crate provides common functionality used across the HistoTrack service:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Request extractors with validation

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::{Config, IdentityProvider};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
