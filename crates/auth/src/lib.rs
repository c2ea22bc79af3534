//! Authentication for the HistoTrack API
//!
//! Identity is delegated to an external provider: callers present a bearer
//! identity token, an [`IdentityVerifier`] checks it, and the resulting
//! [`AuthContext`] carries the verified email used for ownership decisions.
//! Extractors work with any state implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwks;
mod jwt;
mod mock;
mod verifier;

pub use backend::AuthBackend;
pub use claims::IdentityClaims;
pub use config::AuthConfig;
pub use context::{AuthContext, AuthIdentity, Owned};
pub use error::AuthError;
pub use extractors::AuthUser;
pub use jwks::JwksVerifier;
pub use jwt::Hs256Verifier;
pub use mock::MockVerifier;
pub use verifier::{IdentityVerifier, VerifierFactory};
