//! In-process document store.
//!
//! Used when no `DATABASE_URL` is configured, and by tests. Writes take the
//! map's write lock, so a `compare_and_swap` observes and updates a document
//! atomically.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::documents::{Document, DocumentQuery, StoreError, WriteResult};
use super::traits::BaseDocumentStore;

type Collection = HashMap<String, Document>;

/// Thread-safe, cloneable. Clones share the same underlying collections.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }

    /// Create or overwrite a document unconditionally, bumping its version
    pub async fn set(&self, collection: &str, id: &str, data: Value) -> WriteResult {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        let version = docs.get(id).map_or(1, |doc| doc.version + 1);
        debug!(collection, id, version, "set document");
        Self::write(docs, id, data, version)
    }

    /// Remove a document outright (no tombstone)
    pub async fn remove(&self, collection: &str, id: &str) -> Option<Document> {
        self.collections
            .write()
            .await
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
    }

    fn write(docs: &mut Collection, id: &str, data: Value, version: i64) -> WriteResult {
        let update_time = Utc::now();
        docs.insert(
            id.to_string(),
            Document {
                id: id.to_string(),
                data,
                version,
                update_time,
            },
        );
        WriteResult {
            id: id.to_string(),
            version,
            update_time,
        }
    }
}

#[async_trait]
impl BaseDocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn insert(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<WriteResult, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(id) {
            return Err(StoreError::conflict(collection, id));
        }
        debug!(collection, id, "insert document");
        Ok(Self::write(docs, id, data, 1))
    }

    async fn compare_and_swap(
        &self,
        collection: &str,
        id: &str,
        expected_version: i64,
        data: Value,
    ) -> Result<WriteResult, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.get(id) {
            Some(current) if current.version == expected_version => {
                debug!(collection, id, expected_version, "compare-and-swap document");
                Ok(Self::write(docs, id, data, expected_version + 1))
            }
            _ => Err(StoreError::conflict(collection, id)),
        }
    }

    async fn query(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let mut matched: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| query.matches(&doc.data))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        query.sort(&mut matched);
        Ok(matched)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
