//! Authentication configuration

use histotrack_common::{Config, IdentityProvider};
use std::time::Duration;

/// How long fetched signing keys are trusted before a refresh
pub const DEFAULT_JWKS_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub provider: IdentityProvider,
    pub jwt_secret: Option<String>,
    pub jwks_url: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub jwks_cache_ttl: Duration,
}

impl AuthConfig {
    /// Shared-secret configuration, used by local development and tests
    pub fn hs256(secret: impl Into<String>) -> Self {
        Self {
            provider: IdentityProvider::Hs256,
            jwt_secret: Some(secret.into()),
            jwks_url: None,
            issuer: None,
            audience: None,
            jwks_cache_ttl: DEFAULT_JWKS_CACHE_TTL,
        }
    }
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            provider: config.identity_provider,
            jwt_secret: config.jwt_secret.clone(),
            jwks_url: config.identity_jwks_url.clone(),
            issuer: config.identity_issuer.clone(),
            audience: config.identity_audience.clone(),
            jwks_cache_ttl: DEFAULT_JWKS_CACHE_TTL,
        }
    }
}
