//! Persistence gateway over a document store.
//!
//! # Collections
//!
//! One collection per entity kind, all in a single database:
//!
//! - `commodity` - Commodities keyed by `name`
//! - `comment` - Comments, no key (insert-only, matched by field values)
//! - `user` - Users keyed by `username`
//! - `cart` - Carts keyed by `username`
//! - `token` - Token signing secrets keyed by `username`
//!
//! # Layers
//!
//! [`DocumentStore`] is the untyped seam with two backends ([`MongoStore`] and
//! [`MemoryStore`]). [`Documents`] adds serde mapping and the gateway contract
//! (`list_all`, `get_one`, `upsert`, `insert`, `delete_matching`) on top of it,
//! and the per-entity repositories build their filters from natural keys.
//!
//! Every write is awaited to completion before the caller continues. There is
//! no locking and no optimistic concurrency: concurrent writers to the same key
//! are resolved by the store, last write wins.

pub mod carts;
pub mod comments;
pub mod commodities;
pub mod memory;
pub mod mongo;
pub mod tokens;
pub mod users;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{self, Document};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::StoreConfig;

pub use carts::CartRepository;
pub use comments::{CommentMatch, CommentRepository};
pub use commodities::CommodityRepository;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use tokens::TokenKeyRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store could not be reached or rejected the operation.
    #[error("store unavailable: {0}")]
    Unavailable(#[from] mongodb::error::Error),

    /// Data in the store is corrupted or does not match the record shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// No document matched the requested key.
    #[error("{entity} not found")]
    NotFound {
        /// Human-readable entity name, e.g. "commodity".
        entity: &'static str,
    },
}

/// Untyped operations on a document store.
///
/// Filters are exact-field equality: a document matches when every field in
/// the filter is present with an equal value.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in `collection` matching `filter` (empty filter = all).
    async fn find(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, RepositoryError>;

    /// The first document matching `filter`, if any.
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, RepositoryError>;

    /// Insert `document` unconditionally.
    async fn insert(&self, collection: &str, document: Document) -> Result<(), RepositoryError>;

    /// Replace the document matching `filter` with `document`, or insert it
    /// when nothing matches.
    async fn replace_or_insert(
        &self,
        collection: &str,
        filter: Document,
        document: Document,
    ) -> Result<(), RepositoryError>;

    /// Set `fields` on every document matching `filter`. Returns the match count.
    async fn update_matching(
        &self,
        collection: &str,
        filter: Document,
        fields: Document,
    ) -> Result<u64, RepositoryError>;

    /// Delete every document matching `filter`. Returns the deleted count.
    async fn delete_matching(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<u64, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Connect to the configured document store.
///
/// # Errors
///
/// Returns `RepositoryError::Unavailable` if MongoDB cannot be reached.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, RepositoryError> {
    match config {
        StoreConfig::MongoDb { uri, database } => {
            let store = MongoStore::connect(uri, database).await?;
            Ok(Arc::new(store))
        }
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Typed view of one collection.
///
/// Maps records of type `T` to and from BSON documents and implements the
/// gateway contract shared by every entity.
pub struct Documents<'a, T> {
    store: &'a dyn DocumentStore,
    collection: &'a str,
    entity: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<'a, T> Documents<'a, T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a typed view of `collection`; `entity` names it in errors.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore, collection: &'a str, entity: &'static str) -> Self {
        Self {
            store,
            collection,
            entity,
            _record: PhantomData,
        }
    }

    /// Every record in the collection. An empty collection is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a document cannot be decoded.
    pub async fn list_all(&self) -> Result<Vec<T>, RepositoryError> {
        self.find_matching(Document::new()).await
    }

    /// Every record matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a document cannot be decoded.
    pub async fn find_matching(&self, filter: Document) -> Result<Vec<T>, RepositoryError> {
        let documents = self.store.find(self.collection, filter).await?;
        documents.into_iter().map(|d| self.decode(d)).collect()
    }

    /// The single record matching `key`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no document matches.
    /// Returns `RepositoryError::Unavailable` if the query fails.
    pub async fn get_one(&self, key: Document) -> Result<T, RepositoryError> {
        let document = self
            .store
            .find_one(self.collection, key)
            .await?
            .ok_or(RepositoryError::NotFound {
                entity: self.entity,
            })?;
        self.decode(document)
    }

    /// Create the record, or fully replace the one stored under `key`.
    ///
    /// Repeating the call with the same record leaves exactly one document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the write fails.
    pub async fn upsert(&self, key: Document, record: &T) -> Result<(), RepositoryError> {
        let document = self.encode(record)?;
        self.store
            .replace_or_insert(self.collection, key, document)
            .await
    }

    /// Always create a new document, even if an equal one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the write fails.
    pub async fn insert(&self, record: &T) -> Result<(), RepositoryError> {
        let document = self.encode(record)?;
        self.store.insert(self.collection, document).await
    }

    /// Delete every document matching `filter`; zero matches is success.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the delete fails.
    pub async fn delete_matching(&self, filter: Document) -> Result<u64, RepositoryError> {
        self.store.delete_matching(self.collection, filter).await
    }

    /// Set `fields` on every document matching `filter`; zero matches is success.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the update fails.
    pub async fn update_matching(
        &self,
        filter: Document,
        fields: Document,
    ) -> Result<u64, RepositoryError> {
        self.store
            .update_matching(self.collection, filter, fields)
            .await
    }

    fn encode(&self, record: &T) -> Result<Document, RepositoryError> {
        bson::to_document(record).map_err(|e| {
            RepositoryError::DataCorruption(format!("cannot encode {}: {e}", self.entity))
        })
    }

    fn decode(&self, document: Document) -> Result<T, RepositoryError> {
        bson::from_document(document).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid {} document: {e}", self.entity))
        })
    }
}
