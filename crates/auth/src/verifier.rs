//! Identity verifier abstraction and factory

use std::sync::Arc;

use histotrack_common::IdentityProvider;

use crate::claims::IdentityClaims;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::jwks::JwksVerifier;
use crate::jwt::Hs256Verifier;
use crate::mock::MockVerifier;

/// Verifies caller-presented identity tokens against an identity provider
#[async_trait::async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify the token and return its claims
    async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError>;
}

/// Identity verifier factory
pub struct VerifierFactory;

impl VerifierFactory {
    /// Create an identity verifier based on configuration
    pub fn create(config: &AuthConfig) -> Result<Arc<dyn IdentityVerifier>, AuthError> {
        match config.provider {
            IdentityProvider::Jwks => {
                let url = config.jwks_url.as_deref().ok_or_else(|| {
                    AuthError::Misconfigured("IDENTITY_JWKS_URL is not set".to_string())
                })?;
                tracing::info!(jwks_url = %url, "Creating JWKS identity verifier");
                Ok(Arc::new(JwksVerifier::new(
                    url,
                    config.issuer.clone(),
                    config.audience.clone(),
                    config.jwks_cache_ttl,
                )))
            }
            IdentityProvider::Hs256 => {
                let secret = config.jwt_secret.as_deref().ok_or_else(|| {
                    AuthError::Misconfigured("JWT_SECRET is not set".to_string())
                })?;
                tracing::info!("Creating HS256 identity verifier");
                Ok(Arc::new(Hs256Verifier::new(
                    secret,
                    config.issuer.as_deref(),
                    config.audience.as_deref(),
                )))
            }
            IdentityProvider::Mock => {
                tracing::warn!("Creating mock identity verifier, every token must be registered");
                Ok(Arc::new(MockVerifier::new()))
            }
        }
    }
}
