//! Shared-secret JWT validation and bearer token extraction

use axum::http::HeaderValue;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::claims::IdentityClaims;
use crate::error::AuthError;
use crate::verifier::IdentityVerifier;

/// Build validation rules shared by every JWT-based verifier
pub(crate) fn build_validation(
    algorithm: Algorithm,
    issuer: Option<&str>,
    audience: Option<&str>,
) -> Validation {
    let mut validation = Validation::new(algorithm);

    if let Some(aud) = audience {
        validation.set_audience(&[aud]);
    } else {
        validation.validate_aud = false;
    }

    if let Some(iss) = issuer {
        validation.set_issuer(&[iss]);
    }

    validation
}

/// Verifies HS256 tokens signed with a shared secret
pub struct Hs256Verifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Hs256Verifier {
    pub fn new(secret: &str, issuer: Option<&str>, audience: Option<&str>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: build_validation(Algorithm::HS256, issuer, audience),
        }
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for Hs256Verifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        let token_data = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "JWT validation failed");
                AuthError::InvalidToken
            })?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from Authorization header
pub(crate) fn extract_bearer_token(header: &HeaderValue) -> Result<String, AuthError> {
    let header_str = header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    match header_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AuthError::InvalidAuthorizationFormat),
    }
}
