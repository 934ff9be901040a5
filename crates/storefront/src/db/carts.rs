//! Cart repository.

use bazaar_core::{Cart, Username};
use mongodb::bson::doc;

use super::{DocumentStore, Documents, RepositoryError};

/// Repository for the cart collection, keyed by `username`.
pub struct CartRepository<'a> {
    docs: Documents<'a, Cart>,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore, collection: &'a str) -> Self {
        Self {
            docs: Documents::new(store, collection, "cart"),
        }
    }

    /// The cart stored for `username`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user never wrote a cart.
    pub async fn get(&self, username: &Username) -> Result<Cart, RepositoryError> {
        self.docs
            .get_one(doc! { "username": username.as_str() })
            .await
    }

    /// Replace the user's whole cart with `cart`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the write fails.
    pub async fn replace(&self, cart: &Cart) -> Result<(), RepositoryError> {
        self.docs
            .upsert(doc! { "username": cart.username.as_str() }, cart)
            .await
    }
}
