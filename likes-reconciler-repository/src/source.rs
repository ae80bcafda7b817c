//! Selection between the Appwrite and in-memory document stores.

use std::sync::Arc;

use crate::appwrite::{AppwriteSettings, AppwriteStore};
use crate::errors::DocumentStoreError;
use crate::interfaces::DocumentStore;
use crate::memory::InMemoryDocumentStore;

/// Configuration for the document store backend.
///
/// The Appwrite variant holds everything except the API key, which is supplied
/// per execution when connecting.
///
/// # Example
///
/// ```ignore
/// use likes_reconciler_repository::DocumentStoreSource;
///
/// let source = DocumentStoreSource::appwrite("https://cloud.appwrite.io/v1", "supatube", "database");
/// let store = source.connect(Some(api_key))?;
/// ```
#[derive(Clone)]
pub enum DocumentStoreSource {
    /// Use a shared in-memory store. No credentials are needed.
    Memory(Arc<InMemoryDocumentStore>),

    /// Connect to an Appwrite project.
    Appwrite {
        endpoint: String,
        project_id: String,
        database_id: String,
    },
}

impl DocumentStoreSource {
    /// Create an in-memory source around the given store.
    pub fn memory(store: Arc<InMemoryDocumentStore>) -> Self {
        Self::Memory(store)
    }

    /// Create an Appwrite source.
    pub fn appwrite(
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Self {
        Self::Appwrite {
            endpoint: endpoint.into(),
            project_id: project_id.into(),
            database_id: database_id.into(),
        }
    }

    /// Create the `DocumentStore` for one execution.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<dyn DocumentStore>)` - A store ready for use
    /// * `Err(DocumentStoreError::MissingCredentials)` - If Appwrite is selected and no API key is given
    /// * `Err(DocumentStoreError::Connection)` - If the Appwrite endpoint is invalid
    pub fn connect(&self, api_key: Option<&str>) -> Result<Arc<dyn DocumentStore>, DocumentStoreError> {
        match self {
            Self::Memory(store) => Ok(store.clone() as Arc<dyn DocumentStore>),
            Self::Appwrite {
                endpoint,
                project_id,
                database_id,
            } => {
                let api_key = api_key
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| {
                        DocumentStoreError::missing_credentials("No Appwrite API key provided")
                    })?;

                let store = AppwriteStore::new(AppwriteSettings {
                    endpoint: endpoint.clone(),
                    project_id: project_id.clone(),
                    database_id: database_id.clone(),
                    api_key: api_key.to_string(),
                })?;
                Ok(Arc::new(store) as Arc<dyn DocumentStore>)
            }
        }
    }

    /// Short backend name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Appwrite { .. } => "appwrite",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_connect_needs_no_key() {
        let source = DocumentStoreSource::memory(Arc::new(InMemoryDocumentStore::new()));
        assert!(source.connect(None).is_ok());
        assert_eq!(source.name(), "memory");
    }

    #[test]
    fn test_appwrite_requires_key() {
        let source =
            DocumentStoreSource::appwrite("https://cloud.appwrite.io/v1", "supatube", "database");

        assert!(matches!(
            source.connect(None),
            Err(DocumentStoreError::MissingCredentials(_))
        ));
        assert!(matches!(
            source.connect(Some("")),
            Err(DocumentStoreError::MissingCredentials(_))
        ));
        assert!(source.connect(Some("key")).is_ok());
    }

    #[test]
    fn test_appwrite_invalid_endpoint() {
        let source = DocumentStoreSource::appwrite("::", "supatube", "database");
        assert!(matches!(
            source.connect(Some("key")),
            Err(DocumentStoreError::Connection(_))
        ));
    }
}
