//! In-process document store.
//!
//! Used by tests and for local runs without a MongoDB server
//! (`BAZAAR_STORE=memory`). Matching follows the same exact-field equality
//! rules as the MongoDB backend for the flat filters the repositories build.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use tokio::sync::RwLock;

use super::{DocumentStore, RepositoryError};

const ID_FIELD: &str = "_id";

/// Document store holding every collection in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}

fn with_id(mut document: Document, id: Bson) -> Document {
    document.insert(ID_FIELD, id);
    document
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, RepositoryError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| matches(d, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, RepositoryError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|d| matches(d, &filter)).cloned()))
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<(), RepositoryError> {
        let id = document
            .get(ID_FIELD)
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));
        self.collections
            .write()
            .await
            .entry(collection.to_owned())
            .or_default()
            .push(with_id(document, id));
        Ok(())
    }

    async fn replace_or_insert(
        &self,
        collection: &str,
        filter: Document,
        document: Document,
    ) -> Result<(), RepositoryError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_owned()).or_default();

        if let Some(existing) = documents.iter_mut().find(|d| matches(d, &filter)) {
            let id = existing
                .get(ID_FIELD)
                .cloned()
                .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));
            *existing = with_id(document, id);
        } else {
            documents.push(with_id(document, Bson::ObjectId(ObjectId::new())));
        }
        Ok(())
    }

    async fn update_matching(
        &self,
        collection: &str,
        filter: Document,
        fields: Document,
    ) -> Result<u64, RepositoryError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let mut matched = 0;
        for document in documents.iter_mut().filter(|d| matches(d, &filter)) {
            for (field, value) in &fields {
                document.insert(field.clone(), value.clone());
            }
            matched += 1;
        }
        Ok(matched)
    }

    async fn delete_matching(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<u64, RepositoryError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = documents.len();
        documents.retain(|d| !matches(d, &filter));
        Ok(u64::try_from(before - documents.len()).unwrap_or(u64::MAX))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
