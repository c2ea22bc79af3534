//! In-memory identity verifier for tests

use std::collections::HashMap;
use std::sync::Mutex;

use crate::claims::IdentityClaims;
use crate::error::AuthError;
use crate::verifier::IdentityVerifier;

/// Identity verifier that accepts only explicitly registered tokens
#[derive(Debug, Default)]
pub struct MockVerifier {
    tokens: Mutex<HashMap<String, IdentityClaims>>,
}

impl MockVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token for the given user, builder style
    pub fn with_user(self, token: &str, uid: &str, email: &str) -> Self {
        self.register(token, uid, Some(email));
        self
    }

    /// Register a token. `email = None` simulates a provider account without email.
    pub fn register(&self, token: &str, uid: &str, email: Option<&str>) {
        let claims = IdentityClaims {
            sub: uid.to_string(),
            email: email.map(str::to_string),
            email_verified: Some(email.is_some()),
            iat: 0,
            exp: u64::MAX,
            aud: None,
            iss: Some("mock".to_string()),
        };

        self.tokens
            .lock()
            .expect("mock verifier lock poisoned")
            .insert(token.to_string(), claims);
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for MockVerifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        self.tokens
            .lock()
            .expect("mock verifier lock poisoned")
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
