//! User repository for document store operations.

use bazaar_core::{User, Username};
use mongodb::bson::doc;

use super::{DocumentStore, Documents, RepositoryError};

/// Repository for the user collection, keyed by `username`.
pub struct UserRepository<'a> {
    docs: Documents<'a, User>,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore, collection: &'a str) -> Self {
        Self {
            docs: Documents::new(store, collection, "user"),
        }
    }

    /// Every registered user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        self.docs.list_all().await
    }

    /// Users stored under `username`: normally zero or one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Vec<User>, RepositoryError> {
        self.docs
            .find_matching(doc! { "username": username })
            .await
    }

    /// Create or fully replace the user stored under `user.username`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the write fails.
    pub async fn upsert(&self, user: &User) -> Result<(), RepositoryError> {
        self.docs.upsert(username_key(&user.username), user).await
    }
}

fn username_key(username: &Username) -> mongodb::bson::Document {
    doc! { "username": username.as_str() }
}
