//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    MissingAuthorization,
    InvalidAuthorizationFormat,
    InvalidToken,
    /// Token verified but carries no email claim
    MissingEmail,
    /// Caller asked for data scoped to another identity
    IdentityMismatch,
    /// Caller does not own the resource
    NotOwner,
    /// The identity provider could not be reached
    VerifierUnavailable,
    Misconfigured(String),
}

impl AuthError {
    fn parts(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            AuthError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                "MISSING_AUTHORIZATION",
                "Authorization header required",
            ),
            AuthError::InvalidAuthorizationFormat => (
                StatusCode::UNAUTHORIZED,
                "INVALID_AUTHORIZATION",
                "Invalid authorization header format",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token",
            ),
            AuthError::MissingEmail => (
                StatusCode::BAD_REQUEST,
                "MISSING_EMAIL",
                "Email is required",
            ),
            AuthError::IdentityMismatch => (
                StatusCode::FORBIDDEN,
                "IDENTITY_MISMATCH",
                "Requested email does not match the authenticated user",
            ),
            AuthError::NotOwner => (
                StatusCode::FORBIDDEN,
                "NOT_OWNER",
                "Only the owner can modify this artifact",
            ),
            AuthError::VerifierUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "VERIFIER_UNAVAILABLE",
                "Identity provider unavailable",
            ),
            AuthError::Misconfigured(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_ERROR",
                "Authentication failed",
            ),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Misconfigured(msg) => write!(f, "Authentication misconfigured: {}", msg),
            other => write!(f, "{}", other.parts().2),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if let AuthError::Misconfigured(ref msg) = self {
            tracing::error!(error = %msg, "Authentication misconfigured");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for histotrack_common::Error {
    fn from(err: AuthError) -> Self {
        use histotrack_common::Error;

        if let AuthError::Misconfigured(_) = err {
            return Error::Internal(err.to_string());
        }

        let (status, code, message) = err.parts();
        Error::Rejected {
            status,
            code,
            message: message.to_string(),
        }
    }
}
