//! MongoDB document store.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::{Client, Collection, Database};
use secrecy::{ExposeSecret, SecretString};

use super::{DocumentStore, RepositoryError};

/// Document store backed by one MongoDB database.
///
/// The driver's client pools connections internally and is safe to share
/// between concurrent requests.
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect to MongoDB and select `database`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the connection string is
    /// invalid or the server does not answer a ping.
    pub async fn connect(uri: &SecretString, database: &str) -> Result<Self, RepositoryError> {
        let client = Client::with_uri_str(uri.expose_secret()).await?;
        let store = Self {
            database: client.database(database),
        };
        store.ping().await?;
        tracing::info!(database, "Connected to MongoDB");
        Ok(store)
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, RepositoryError> {
        let cursor = self.collection(collection).find(filter).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        tracing::debug!(collection, count = documents.len(), "Fetched documents");
        Ok(documents)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, RepositoryError> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<(), RepositoryError> {
        let result = self.collection(collection).insert_one(document).await?;
        tracing::debug!(collection, id = %result.inserted_id, "Inserted document");
        Ok(())
    }

    async fn replace_or_insert(
        &self,
        collection: &str,
        filter: Document,
        document: Document,
    ) -> Result<(), RepositoryError> {
        let result = self
            .collection(collection)
            .replace_one(filter, document)
            .upsert(true)
            .await?;
        tracing::debug!(
            collection,
            matched = result.matched_count,
            upserted = result.upserted_id.is_some(),
            "Upserted document"
        );
        Ok(())
    }

    async fn update_matching(
        &self,
        collection: &str,
        filter: Document,
        fields: Document,
    ) -> Result<u64, RepositoryError> {
        let result = self
            .collection(collection)
            .update_many(filter, doc! { "$set": fields })
            .await?;
        Ok(result.matched_count)
    }

    async fn delete_matching(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<u64, RepositoryError> {
        let result = self.collection(collection).delete_many(filter).await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
