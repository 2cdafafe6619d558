// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "mark a job post as deleted") lives in domain code that uses these traits.
//
// Naming convention: Base* for trait names (e.g., BaseDocumentStore)

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::documents::{Document, DocumentQuery, StoreError, WriteResult};

// =============================================================================
// Document Store Trait (Infrastructure - transactional key/document storage)
// =============================================================================

/// Collection-scoped document storage with conditional writes.
///
/// Atomic read-modify-write is expressed as `get` followed by
/// `compare_and_swap` against the version that was read. A lost race
/// surfaces as `StoreError::Conflict`; engines never retry on their own.
#[async_trait]
pub trait BaseDocumentStore: Send + Sync {
    /// Generate a fresh, unique document id
    fn new_document_id(&self) -> String {
        Uuid::now_v7().simple().to_string()
    }

    /// Fetch a document, `None` if it does not exist
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create a document; fails with `Conflict` if the id is already taken
    async fn insert(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<WriteResult, StoreError>;

    /// Overwrite a document only if its current version equals `expected_version`.
    ///
    /// Fails with `Conflict` when the document was modified or deleted since it was read.
    async fn compare_and_swap(
        &self,
        collection: &str,
        id: &str,
        expected_version: i64,
        data: Value,
    ) -> Result<WriteResult, StoreError>;

    /// Run a filtered, ordered query over one collection
    async fn query(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, StoreError>;

    /// Check the engine is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
