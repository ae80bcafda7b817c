//! Document store trait definition.
//!
//! This module defines the abstract interface the reconciler consumes. Only the
//! two operations it needs are exposed: a bounded equality listing and a delete
//! by id.

use async_trait::async_trait;
use likes_reconciler_shared::VoteRecord;

use crate::errors::DocumentStoreError;

/// Abstracts the underlying document store (Appwrite, in-memory, etc.).
///
/// Implementations are injected into the reconciler as `Arc<dyn DocumentStore>`
/// so tests can swap in [`InMemoryDocumentStore`](crate::InMemoryDocumentStore).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List documents of a collection whose `field` equals `value`.
    ///
    /// At most `limit` documents are returned; anything beyond the bound is not
    /// visible to the caller.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection identifier
    /// * `field` - The attribute to filter on
    /// * `value` - The value the attribute must equal
    /// * `limit` - Maximum number of documents to return
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<VoteRecord>)` - The matching documents, in store order
    /// * `Err(DocumentStoreError)` - If the query fails
    async fn list_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        limit: usize,
    ) -> Result<Vec<VoteRecord>, DocumentStoreError>;

    /// Delete a document by id.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was deleted
    /// * `Err(DocumentStoreError::NotFound)` - If it no longer exists
    /// * `Err(DocumentStoreError)` - If the deletion was refused or failed
    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError>;
}
