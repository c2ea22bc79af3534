//! Concrete authentication backend
//!
//! Wraps the configured [`IdentityVerifier`] and turns verified claims into
//! an [`AuthContext`].

use std::sync::Arc;

use crate::claims::IdentityClaims;
use crate::config::AuthConfig;
use crate::context::{AuthContext, AuthIdentity};
use crate::error::AuthError;
use crate::verifier::{IdentityVerifier, VerifierFactory};

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    verifier: Arc<dyn IdentityVerifier>,
}

impl AuthBackend {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }

    /// Build a backend with the verifier selected by configuration
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Ok(Self::new(VerifierFactory::create(config)?))
    }

    /// Verify a bearer token and resolve the caller's identity
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = self.verifier.verify(token).await?;
        let identity = identity_from_claims(claims)?;

        tracing::debug!(uid = %identity.uid, email = %identity.email, "Identity token verified");

        Ok(AuthContext::new(identity))
    }
}

fn identity_from_claims(claims: IdentityClaims) -> Result<AuthIdentity, AuthError> {
    if claims.sub.trim().is_empty() {
        return Err(AuthError::InvalidToken);
    }

    let email = claims
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or(AuthError::MissingEmail)?;

    Ok(AuthIdentity {
        uid: claims.sub,
        email,
        email_verified: claims.email_verified.unwrap_or(false),
    })
}
