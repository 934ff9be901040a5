//! Token authority error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur while issuing or verifying bearer tokens.
///
/// Every verification failure maps to 401; only `Signing` and `Repository`
/// (both raised while issuing) are server errors. Messages never contain the
/// token, the secret or the password.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No `Authorization: Bearer` header was sent.
    #[error("missing bearer token")]
    MissingToken,

    /// The token is not a well-formed JWT.
    #[error("malformed token")]
    Malformed,

    /// The token was not signed with the secret on file for this user.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token was issued to a different user.
    #[error("token was issued to another user")]
    WrongSubject,

    /// The token's expiry time has passed.
    #[error("token expired")]
    Expired,

    /// The user has no secret on file.
    #[error("user is not registered")]
    Unregistered,

    /// The secret could not be loaded; verification fails closed.
    #[error("token could not be verified")]
    SecretUnavailable,

    /// Signing a new token failed.
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Persisting the secret failed.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl TokenError {
    /// Returns true for failures that mean "reject the request" rather than
    /// "the server broke".
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::Signing(_) | Self::Repository(_))
    }
}
