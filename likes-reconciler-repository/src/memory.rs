//! In-memory document store for testing and local development.
//!
//! The `InMemoryDocumentStore` holds vote documents per collection and supports
//! failure injection, allowing reconciler tests to run without network access.
//!
//! # Example
//!
//! ```ignore
//! use likes_reconciler_repository::{DocumentStore, InMemoryDocumentStore};
//! use likes_reconciler_shared::{delete_grant_for, UserId, VoteRecord};
//!
//! let store = InMemoryDocumentStore::new();
//! let user = UserId::new("u1");
//! store.insert("video_interactions", VoteRecord::new("a", "v1", vec![delete_grant_for(&user)]));
//!
//! let votes = store.list_by_field("video_interactions", "videoId", "v1", 100).await?;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use likes_reconciler_shared::VoteRecord;

use crate::errors::DocumentStoreError;
use crate::interfaces::DocumentStore;

const VIDEO_ID_FIELD: &str = "videoId";

/// Document store that keeps everything in process memory.
///
/// Documents are listed in insertion order. Only the `videoId` attribute can be
/// filtered on; any other field matches nothing.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<VoteRecord>>>,
    delete_failures: RwLock<HashMap<String, DocumentStoreError>>,
    list_failure: RwLock<Option<DocumentStoreError>>,
    list_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with documents in one collection.
    pub fn with_records(collection: &str, records: impl IntoIterator<Item = VoteRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(collection, record);
        }
        store
    }

    /// Add a document to a collection.
    pub fn insert(&self, collection: &str, record: VoteRecord) {
        self.collections
            .write()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    /// Snapshot of every document in a collection.
    pub fn records(&self, collection: &str) -> Vec<VoteRecord> {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether a document with `id` exists in the collection.
    pub fn contains(&self, collection: &str, id: &str) -> bool {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .is_some_and(|records| records.iter().any(|r| r.id == id))
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Check if a collection has no documents.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Make every delete of `id` fail with `error` until cleared.
    pub fn fail_delete_for(&self, id: &str, error: DocumentStoreError) {
        self.delete_failures
            .write()
            .unwrap()
            .insert(id.to_string(), error);
    }

    /// Make every list call fail with `error` until cleared.
    pub fn fail_list_with(&self, error: DocumentStoreError) {
        *self.list_failure.write().unwrap() = Some(error);
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.delete_failures.write().unwrap().clear();
        *self.list_failure.write().unwrap() = None;
    }

    /// Number of list calls received.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of delete calls received, successful or not.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        limit: usize,
    ) -> Result<Vec<VoteRecord>, DocumentStoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.list_failure.read().unwrap().clone() {
            return Err(error);
        }
        if field != VIDEO_ID_FIELD {
            return Ok(Vec::new());
        }

        Ok(self
            .collections
            .read()
            .unwrap()
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.video_id.as_deref() == Some(value))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.delete_failures.read().unwrap().get(id).cloned() {
            return Err(error);
        }

        let mut collections = self.collections.write().unwrap();
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| DocumentStoreError::not_found(format!("collection {}", collection)))?;
        let position = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DocumentStoreError::not_found(format!("document {}", id)))?;
        records.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = "video_interactions";

    fn vote(id: &str, video: &str) -> VoteRecord {
        VoteRecord::new(id, video, vec![])
    }

    #[tokio::test]
    async fn test_list_filters_by_video() {
        let store = InMemoryDocumentStore::with_records(
            COLLECTION,
            [vote("a", "v1"), vote("b", "v2"), vote("c", "v1")],
        );

        let listed = store
            .list_by_field(COLLECTION, "videoId", "v1", 100)
            .await
            .unwrap();

        let ids: Vec<_> = listed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_honours_limit() {
        let store = InMemoryDocumentStore::with_records(
            COLLECTION,
            (0..10).map(|i| vote(&format!("d{}", i), "v1")),
        );

        let listed = store
            .list_by_field(COLLECTION, "videoId", "v1", 3)
            .await
            .unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id, "d0");
    }

    #[tokio::test]
    async fn test_list_unknown_field_matches_nothing() {
        let store = InMemoryDocumentStore::with_records(COLLECTION, [vote("a", "v1")]);

        let listed = store
            .list_by_field(COLLECTION, "userId", "v1", 100)
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_document() {
        let store = InMemoryDocumentStore::with_records(COLLECTION, [vote("a", "v1")]);

        store.delete_by_id(COLLECTION, "a").await.unwrap();

        assert!(store.is_empty(COLLECTION));
        assert!(!store.contains(COLLECTION, "a"));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = InMemoryDocumentStore::with_records(COLLECTION, [vote("a", "v1")]);

        let result = store.delete_by_id(COLLECTION, "zzz").await;
        assert!(matches!(result, Err(DocumentStoreError::NotFound(_))));

        let result = store.delete_by_id("other", "a").await;
        assert!(matches!(result, Err(DocumentStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = InMemoryDocumentStore::with_records(COLLECTION, [vote("a", "v1")]);
        store.fail_delete_for("a", DocumentStoreError::transient("boom"));
        store.fail_list_with(DocumentStoreError::transient("down"));

        assert!(store.delete_by_id(COLLECTION, "a").await.is_err());
        assert!(store
            .list_by_field(COLLECTION, "videoId", "v1", 100)
            .await
            .is_err());
        assert!(store.contains(COLLECTION, "a"));

        store.clear_failures();
        store.delete_by_id(COLLECTION, "a").await.unwrap();
        assert_eq!(store.delete_calls(), 2);
    }
}
