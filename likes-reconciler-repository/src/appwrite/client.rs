//! Appwrite REST client.

use std::fmt;

use async_trait::async_trait;
use likes_reconciler_shared::VoteRecord;
use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::appwrite::query::Query;
use crate::errors::DocumentStoreError;
use crate::interfaces::DocumentStore;

/// Connection settings for an Appwrite project.
#[derive(Clone)]
pub struct AppwriteSettings {
    /// API endpoint, e.g. `https://cloud.appwrite.io/v1`.
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub api_key: String,
}

impl fmt::Debug for AppwriteSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppwriteSettings")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("database_id", &self.database_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    total: u64,
    documents: Vec<VoteRecord>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Document store backed by the Appwrite Databases API.
///
/// # Example
///
/// ```ignore
/// use likes_reconciler_repository::{AppwriteSettings, AppwriteStore, DocumentStore};
///
/// let store = AppwriteStore::new(AppwriteSettings {
///     endpoint: "https://cloud.appwrite.io/v1".to_string(),
///     project_id: "supatube".to_string(),
///     database_id: "database".to_string(),
///     api_key: api_key.to_string(),
/// })?;
/// let votes = store.list_by_field("video_interactions", "videoId", "v1", 100).await?;
/// ```
pub struct AppwriteStore {
    base: Url,
    settings: AppwriteSettings,
    client: ReqwestClient,
}

impl AppwriteStore {
    /// Create a new store client.
    ///
    /// # Returns
    ///
    /// * `Ok(AppwriteStore)` - A client ready to issue requests
    /// * `Err(DocumentStoreError::Connection)` - If the endpoint is not a usable base URL
    /// * `Err(DocumentStoreError::MissingCredentials)` - If the API key is empty
    pub fn new(settings: AppwriteSettings) -> Result<Self, DocumentStoreError> {
        let base = Url::parse(&settings.endpoint)
            .map_err(|e| DocumentStoreError::connection(format!("Invalid endpoint: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(DocumentStoreError::connection(format!(
                "Endpoint {} cannot be used as a base URL",
                settings.endpoint
            )));
        }
        if settings.api_key.trim().is_empty() {
            return Err(DocumentStoreError::missing_credentials(
                "Appwrite API key is empty",
            ));
        }

        let client = ReqwestClient::builder()
            .build()
            .map_err(|e| DocumentStoreError::connection(e.to_string()))?;

        debug!(
            endpoint = %settings.endpoint,
            project_id = %settings.project_id,
            database_id = %settings.database_id,
            "Created Appwrite document store"
        );

        Ok(Self {
            base,
            settings,
            client,
        })
    }

    /// Build `{endpoint}/databases/{db}/collections/{collection}/documents[/{id}]`.
    fn documents_url(&self, collection: &str, document_id: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "databases",
                self.settings.database_id.as_str(),
                "collections",
                collection,
                "documents",
            ]);
            if let Some(id) = document_id {
                segments.push(id);
            }
        }
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Appwrite-Project", self.settings.project_id.as_str())
            .header("X-Appwrite-Key", self.settings.api_key.as_str())
            .header("Content-Type", "application/json")
    }

    /// Turn a non-2xx response into an error, using the store's message when present.
    async fn error_for_status(response: Response) -> Result<Response, DocumentStoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        Err(DocumentStoreError::from_status(status.as_u16(), message))
    }
}

#[async_trait]
impl DocumentStore for AppwriteStore {
    async fn list_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        limit: usize,
    ) -> Result<Vec<VoteRecord>, DocumentStoreError> {
        let mut url = self.documents_url(collection, None);
        url.query_pairs_mut()
            .append_pair("queries[]", &Query::equal(field, value).encode())
            .append_pair("queries[]", &Query::limit(limit).encode());

        let response = self.authorized(self.client.get(url)).send().await?;
        let response = Self::error_for_status(response).await?;
        let list: DocumentList = response
            .json()
            .await
            .map_err(|e| DocumentStoreError::parse(e.to_string()))?;

        debug!(
            collection = %collection,
            field = %field,
            value = %value,
            total = list.total,
            returned = list.documents.len(),
            "Listed documents"
        );

        Ok(list.documents)
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError> {
        let url = self.documents_url(collection, Some(id));
        let response = self.authorized(self.client.delete(url)).send().await?;
        Self::error_for_status(response).await?;

        debug!(collection = %collection, document_id = %id, "Deleted document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(endpoint: &str) -> AppwriteSettings {
        AppwriteSettings {
            endpoint: endpoint.to_string(),
            project_id: "supatube".to_string(),
            database_id: "database".to_string(),
            api_key: "secret".to_string(),
        }
    }

    #[test]
    fn test_documents_url() {
        let store = AppwriteStore::new(settings("https://cloud.appwrite.io/v1")).unwrap();

        assert_eq!(
            store.documents_url("video_interactions", None).as_str(),
            "https://cloud.appwrite.io/v1/databases/database/collections/video_interactions/documents"
        );
        assert_eq!(
            store.documents_url("video_interactions", Some("doc1")).as_str(),
            "https://cloud.appwrite.io/v1/databases/database/collections/video_interactions/documents/doc1"
        );
    }

    #[test]
    fn test_documents_url_trailing_slash() {
        let store = AppwriteStore::new(settings("https://cloud.appwrite.io/v1/")).unwrap();

        assert_eq!(
            store.documents_url("c", Some("d")).as_str(),
            "https://cloud.appwrite.io/v1/databases/database/collections/c/documents/d"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = AppwriteStore::new(settings("not a url"));
        assert!(matches!(result, Err(DocumentStoreError::Connection(_))));

        let result = AppwriteStore::new(settings("mailto:ops@example.com"));
        assert!(matches!(result, Err(DocumentStoreError::Connection(_))));
    }

    #[test]
    fn test_empty_api_key() {
        let mut settings = settings("https://cloud.appwrite.io/v1");
        settings.api_key = "  ".to_string();

        let result = AppwriteStore::new(settings);
        assert!(matches!(
            result,
            Err(DocumentStoreError::MissingCredentials(_))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", settings("https://cloud.appwrite.io/v1"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_parse_document_list() {
        let raw = r#"{
            "total": 2,
            "documents": [
                {"$id": "a", "videoId": "v1", "$permissions": ["delete(\"user:u1\")"]},
                {"$id": "b", "videoId": "v1", "$permissions": []}
            ]
        }"#;
        let list: DocumentList = serde_json::from_str(raw).unwrap();

        assert_eq!(list.total, 2);
        assert_eq!(list.documents.len(), 2);
        assert_eq!(list.documents[1].id, "b");
    }
}
