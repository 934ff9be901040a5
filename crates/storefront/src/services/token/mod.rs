//! Bearer token authority.
//!
//! A token is an HS256 JWT carrying `sub`, `iat` and `exp`. Each user has exactly one
//! signing secret on file; it is written at registration and replaced on every
//! re-registration, so older tokens stop verifying.
//!
//! ```text
//! Unregistered --register--> Registered --register--> Registered (new secret)
//! ```

mod error;
mod secret;

pub use error::TokenError;
pub use secret::{CredentialConcat, RandomSecret, SecretDeriver, SecretMode};

use std::time::Duration;

use bazaar_core::{IssuedToken, TokenKey, Username};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::db::{RepositoryError, TokenKeyRepository};

/// JWT claims.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Username the token was issued to.
    sub: String,
    /// Issued at (unix seconds).
    iat: i64,
    /// Expires at (unix seconds).
    exp: i64,
}

/// Issues and verifies per-user bearer tokens.
pub struct TokenAuthority<'a> {
    keys: TokenKeyRepository<'a>,
    deriver: &'a dyn SecretDeriver,
    ttl: Duration,
}

impl<'a> TokenAuthority<'a> {
    /// Create a token authority.
    #[must_use]
    pub const fn new(
        keys: TokenKeyRepository<'a>,
        deriver: &'a dyn SecretDeriver,
        ttl: Duration,
    ) -> Self {
        Self { keys, deriver, ttl }
    }

    /// Issue a token for a freshly registered user.
    ///
    /// Must be called after the user record is written. Replaces the user's
    /// stored secret.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if the token cannot be encoded.
    /// Returns `TokenError::Repository` if the secret cannot be stored.
    pub async fn issue(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<IssuedToken, TokenError> {
        self.issue_at(username, password, Utc::now()).await
    }

    /// Issue a token as if the current time were `issued_at`.
    ///
    /// # Errors
    ///
    /// Same as [`TokenAuthority::issue`].
    pub async fn issue_at(
        &self,
        username: &Username,
        password: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let ttl = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX);
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let claims = Claims {
            sub: username.as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let secret = self.deriver.derive(username, password);
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
        )
        .map_err(TokenError::Signing)?;

        self.keys
            .put(&TokenKey {
                username: username.clone(),
                key: secret.expose_secret().to_owned(),
            })
            .await?;

        tracing::info!(username = %username, expires_at = %expires_at, "Issued token");

        Ok(IssuedToken {
            username: username.clone(),
            token,
        })
    }

    /// Check `presented` against the secret on file for `username`.
    ///
    /// Never panics on bad input: a missing, malformed, expired or foreign
    /// token is an `Err`. The `sub` claim must name `username`, since two
    /// users can end up with the same derived secret. A failure to load the
    /// secret also rejects.
    ///
    /// # Errors
    ///
    /// Returns the reason the token was rejected.
    pub async fn verify(
        &self,
        username: &Username,
        presented: Option<&str>,
    ) -> Result<(), TokenError> {
        let token = presented.ok_or(TokenError::MissingToken)?;

        let key = match self.keys.get(username).await {
            Ok(key) => key,
            Err(RepositoryError::NotFound { .. }) => return Err(TokenError::Unregistered),
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Token secret lookup failed");
                return Err(TokenError::SecretUnavailable);
            }
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.sub = Some(username.as_str().to_owned());
        validation.set_required_spec_claims(&["exp", "sub"]);

        jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(key.key.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidSubject => TokenError::WrongSubject,
            ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => TokenError::WrongSubject,
            _ => TokenError::Malformed,
        })?;

        Ok(())
    }
}
