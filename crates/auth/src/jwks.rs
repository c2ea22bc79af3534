//! Verification against a hosted identity provider's published signing keys
//!
//! Hosted providers (Firebase Auth, Auth0, Cognito) sign ID tokens with
//! rotating RSA keys published as a JWKS document. Keys are cached for
//! `cache_ttl` and refetched early when a token names an unknown `kid`.

use std::time::{Duration, Instant};

use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use tokio::sync::RwLock;

use crate::claims::IdentityClaims;
use crate::error::AuthError;
use crate::jwt::build_validation;
use crate::verifier::IdentityVerifier;

/// Unknown `kid`s never trigger refetches more often than this
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Verifies RS256 identity tokens against a remote JWKS
pub struct JwksVerifier {
    http: reqwest::Client,
    jwks_url: Option<String>,
    validation: Validation,
    cache_ttl: Duration,
    cache: RwLock<Option<CachedKeys>>,
}

impl JwksVerifier {
    pub fn new(
        jwks_url: &str,
        issuer: Option<String>,
        audience: Option<String>,
        cache_ttl: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            jwks_url: Some(jwks_url.to_string()),
            validation: build_validation(
                Algorithm::RS256,
                issuer.as_deref(),
                audience.as_deref(),
            ),
            cache_ttl,
            cache: RwLock::new(None),
        }
    }

    /// Verifier over a fixed key set that is never refreshed
    pub fn with_keys(keys: JwkSet, issuer: Option<String>, audience: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            jwks_url: None,
            validation: build_validation(
                Algorithm::RS256,
                issuer.as_deref(),
                audience.as_deref(),
            ),
            cache_ttl: Duration::MAX,
            cache: RwLock::new(Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            })),
        }
    }

    /// Resolve the decoding key for `kid`, refreshing the cache when needed
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                let age = cached.fetched_at.elapsed();
                let fresh = age < self.cache_ttl;

                if fresh || self.jwks_url.is_none() {
                    if let Some(jwk) = cached.keys.find(kid) {
                        return key_from_jwk(jwk);
                    }
                    if self.jwks_url.is_none() || age < MIN_REFRESH_INTERVAL {
                        tracing::debug!(kid = %kid, "Token signed with unknown key");
                        return Err(AuthError::InvalidToken);
                    }
                }
            }
        }

        let keys = self.refresh().await?;
        match keys.find(kid) {
            Some(jwk) => key_from_jwk(jwk),
            None => {
                tracing::debug!(kid = %kid, "Token signed with unknown key after refresh");
                Err(AuthError::InvalidToken)
            }
        }
    }

    async fn refresh(&self) -> Result<JwkSet, AuthError> {
        let url = self.jwks_url.as_deref().ok_or(AuthError::InvalidToken)?;

        let keys = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                tracing::error!(error = %e, jwks_url = %url, "Failed to fetch signing keys");
                AuthError::VerifierUnavailable
            })?
            .json::<JwkSet>()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, jwks_url = %url, "Malformed JWKS document");
                AuthError::VerifierUnavailable
            })?;

        tracing::info!(key_count = keys.keys.len(), "Refreshed identity provider signing keys");

        *self.cache.write().await = Some(CachedKeys {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });

        Ok(keys)
    }
}

fn key_from_jwk(jwk: &jsonwebtoken::jwk::Jwk) -> Result<DecodingKey, AuthError> {
    DecodingKey::from_jwk(jwk).map_err(|e| {
        tracing::warn!(error = %e, "Unusable signing key in JWKS");
        AuthError::InvalidToken
    })
}

#[async_trait::async_trait]
impl IdentityVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Malformed token header");
            AuthError::InvalidToken
        })?;

        if header.alg != Algorithm::RS256 {
            tracing::debug!(alg = ?header.alg, "Rejected token algorithm");
            return Err(AuthError::InvalidToken);
        }

        let kid = header.kid.ok_or(AuthError::InvalidToken)?;
        let key = self.decoding_key(&kid).await?;

        let token_data = decode::<IdentityClaims>(token, &key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Identity token validation failed");
            AuthError::InvalidToken
        })?;

        Ok(token_data.claims)
    }
}
