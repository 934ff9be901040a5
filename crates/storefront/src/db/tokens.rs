//! Token key repository.

use bazaar_core::{TokenKey, Username};
use mongodb::bson::doc;

use super::{DocumentStore, Documents, RepositoryError};

/// Repository for per-user token signing secrets, keyed by `username`.
pub struct TokenKeyRepository<'a> {
    docs: Documents<'a, TokenKey>,
}

impl<'a> TokenKeyRepository<'a> {
    /// Create a new token key repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore, collection: &'a str) -> Self {
        Self {
            docs: Documents::new(store, collection, "token key"),
        }
    }

    /// The secret on file for `username`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user never registered.
    pub async fn get(&self, username: &Username) -> Result<TokenKey, RepositoryError> {
        self.docs
            .get_one(doc! { "username": username.as_str() })
            .await
    }

    /// Store `key`, replacing any previous secret for the same user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the write fails.
    pub async fn put(&self, key: &TokenKey) -> Result<(), RepositoryError> {
        self.docs
            .upsert(doc! { "username": key.username.as_str() }, key)
            .await
    }
}
