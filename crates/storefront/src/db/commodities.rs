//! Commodity repository.

use bazaar_core::Commodity;
use mongodb::bson::doc;

use super::{DocumentStore, Documents, RepositoryError};

/// Repository for the commodity collection, keyed by `name`.
pub struct CommodityRepository<'a> {
    docs: Documents<'a, Commodity>,
}

impl<'a> CommodityRepository<'a> {
    /// Create a new commodity repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore, collection: &'a str) -> Self {
        Self {
            docs: Documents::new(store, collection, "commodity"),
        }
    }

    /// Every commodity, in store order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the query fails.
    pub async fn list(&self) -> Result<Vec<Commodity>, RepositoryError> {
        self.docs.list_all().await
    }

    /// The commodity with exactly this name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no commodity has this name.
    pub async fn get(&self, name: &str) -> Result<Commodity, RepositoryError> {
        self.docs.get_one(doc! { "name": name }).await
    }

    /// Create or fully replace the commodity stored under `commodity.name`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the write fails.
    pub async fn upsert(&self, commodity: &Commodity) -> Result<(), RepositoryError> {
        self.docs
            .upsert(doc! { "name": commodity.name.as_str() }, commodity)
            .await
    }
}
