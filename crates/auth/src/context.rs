//! Authorization context for authenticated callers

use crate::error::AuthError;

/// Verified identity of the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    /// Provider user ID (token subject)
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
}

/// A resource owned by the user identified by an email
pub trait Owned {
    fn owner_email(&self) -> &str;
}

/// Represents an authenticated caller
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: AuthIdentity,
}

impl AuthContext {
    pub fn new(identity: AuthIdentity) -> Self {
        Self { identity }
    }

    /// Verified email of the caller
    pub fn email(&self) -> &str {
        &self.identity.email
    }

    /// Check whether the caller is the given email
    pub fn is(&self, email: &str) -> bool {
        self.identity.email == email
    }

    /// Require that a caller-supplied email matches the verified identity
    pub fn ensure_email(&self, email: &str) -> Result<(), AuthError> {
        if self.is(email) {
            Ok(())
        } else {
            tracing::debug!(
                caller = %self.identity.email,
                requested = %email,
                "Requested email does not match verified identity"
            );
            Err(AuthError::IdentityMismatch)
        }
    }

    /// Allow the operation only when the caller owns the resource
    pub fn authorize_owner<R: Owned + ?Sized>(&self, resource: &R) -> Result<(), AuthError> {
        if self.is(resource.owner_email()) {
            Ok(())
        } else {
            tracing::debug!(
                caller = %self.identity.email,
                owner = %resource.owner_email(),
                "Caller does not own resource"
            );
            Err(AuthError::NotOwner)
        }
    }
}
