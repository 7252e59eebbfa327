use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use noegle_common::models::auth::{Claims, Credentials};
use noegle_directory::UserDirectory;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AuthConfig;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credential token")]
    MissingToken,
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token claims are not valid")]
    ClaimsNotValid,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
    #[error("{0}")]
    Internal(String),
}

/// Hash a password using argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// A freshly signed session token together with the claims inside it
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub claims: Claims,
}

/// Turns verified credentials into signed session tokens. Holds its own
/// copy of the signing secret; nothing here reaches for process globals.
pub struct SessionIssuer {
    directory: Arc<dyn UserDirectory>,
    secret: String,
    admin_email: String,
    ttl_secs: i64,
}

impl SessionIssuer {
    pub fn new(directory: Arc<dyn UserDirectory>, config: &AuthConfig) -> Self {
        Self {
            directory,
            secret: config.signing_secret.clone(),
            admin_email: config.admin_email.clone(),
            ttl_secs: config.session_ttl_secs,
        }
    }

    /// Verify credentials against the directory and mint a signed token.
    /// A directory miss and a password mismatch both come back as
    /// `InvalidCredentials`; callers cannot tell which accounts exist.
    pub fn issue_session(&self, creds: &Credentials) -> Result<IssuedSession, AuthError> {
        let record = self
            .directory
            .lookup(&creds.email)
            .ok_or(AuthError::InvalidCredentials)?;

        // A stored hash that fails to parse is server-side data corruption,
        // not a bad login
        let matches = verify_password(&creds.password, &record.password_hash)
            .map_err(|e| AuthError::Internal(format!("password verification failed: {}", e)))?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            email: record.email.clone(),
            is_admin: record.email == self.admin_email,
            is_valid: true,
            exp: now + self.ttl_secs,
            iat: now,
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(AuthError::Signing)?;

        Ok(IssuedSession { token, claims })
    }
}

/// Verifies presented session tokens. Trust is rooted entirely in the
/// signature and expiry; the directory is never consulted, so directory
/// changes take effect only after outstanding tokens expire.
pub struct SessionAuthenticator {
    secret: String,
}

impl SessionAuthenticator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.signing_secret.clone(),
        }
    }

    /// Check a presented token and return its claims. `None` means the
    /// request carried no token at all, which is distinct from carrying
    /// one that does not decode.
    pub fn authenticate(&self, token: Option<&str>) -> Result<Claims, AuthError> {
        let token = token.ok_or(AuthError::MissingToken)?;

        let mut validation = Validation::new(Algorithm::HS256);
        // jsonwebtoken allows 60s of clock skew by default; expiry here is exact
        validation.leeway = 0;

        let token_data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::MalformedToken(e.to_string()),
        })?;

        let claims = token_data.claims;
        if !claims.is_valid {
            return Err(AuthError::ClaimsNotValid);
        }

        Ok(claims)
    }
}
