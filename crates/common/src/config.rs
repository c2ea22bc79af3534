//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use std::env;

/// Default number of pooled database connections
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Which identity-token verifier the service authenticates against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityProvider {
    /// RS256 tokens checked against a remote JWKS (hosted identity provider)
    Jwks,
    /// HS256 tokens signed with a shared secret (local development)
    Hs256,
    /// In-memory tokens, never use outside tests
    Mock,
}

impl std::str::FromStr for IdentityProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jwks" => Ok(Self::Jwks),
            "hs256" | "jwt" => Ok(Self::Hs256),
            "mock" => Ok(Self::Mock),
            other => Err(anyhow::anyhow!(
                "Unknown IDENTITY_PROVIDER '{}'. Supported providers: jwks, hs256, mock",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,
    pub database_max_connections: u32,

    /// Identity provider configuration
    pub identity_provider: IdentityProvider,
    pub identity_jwks_url: Option<String>,
    pub identity_issuer: Option<String>,
    pub identity_audience: Option<String>,
    pub jwt_secret: Option<String>,

    /// Comma-separated list of allowed CORS origins (permissive when unset)
    pub cors_allowed_origins: Option<String>,

    /// Port for the local development server
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required"))?;

        let identity_jwks_url = lookup("IDENTITY_JWKS_URL");
        let jwt_secret = lookup("JWT_SECRET");

        // Without an explicit choice, a configured JWKS endpoint wins over a shared secret
        let identity_provider = match lookup("IDENTITY_PROVIDER") {
            Some(value) => value.parse()?,
            None if identity_jwks_url.is_some() => IdentityProvider::Jwks,
            None => IdentityProvider::Hs256,
        };

        match identity_provider {
            IdentityProvider::Jwks if identity_jwks_url.is_none() => {
                return Err(anyhow::anyhow!(
                    "IDENTITY_JWKS_URL is required for the jwks identity provider"
                ));
            }
            IdentityProvider::Hs256 if jwt_secret.is_none() => {
                return Err(anyhow::anyhow!(
                    "JWT_SECRET is required for the hs256 identity provider"
                ));
            }
            _ => {}
        }

        let config = Self {
            database_url,
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),

            identity_provider,
            identity_jwks_url,
            identity_issuer: lookup("IDENTITY_ISSUER"),
            identity_audience: lookup("IDENTITY_AUDIENCE"),
            jwt_secret,

            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS"),

            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}
