//! Artifacts domain layer: entities and listing parameters

pub mod entities;
pub mod listing;
