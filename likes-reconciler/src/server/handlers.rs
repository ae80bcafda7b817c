// HTTP request handlers
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{error, info};

use crate::errors::ReconcileError;
use crate::reconciler::{ReconcileOutcome, Reconciler};
use crate::server::state::AppState;

/// Header carrying the per-execution API key.
pub const APPWRITE_KEY_HEADER: &str = "x-appwrite-key";

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Likes reconciler is running")
}

/// Execution endpoint - the body is the created vote document
pub async fn reconcile_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let api_key = headers
        .get(APPWRITE_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    let outcome = handle_execution(&state, api_key, &body).await;
    (outcome.status, Json(outcome))
}

/// Run one execution: resolve credentials, connect the store, reconcile.
///
/// The header key wins over the configured fallback key. Failing to connect is
/// reported like any other configuration problem, before the payload is read.
pub async fn handle_execution(
    state: &AppState,
    api_key: Option<&str>,
    body: &[u8],
) -> ReconcileOutcome {
    info!(
        backend = state.source.name(),
        body_bytes = body.len(),
        header_key = api_key.is_some(),
        "Received execution"
    );

    let api_key = api_key
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .or(state.config.api_key.as_deref());

    let store = match state.source.connect(api_key) {
        Ok(store) => store,
        Err(e) => {
            let err = ReconcileError::from(e);
            error!(error = %err, "Failed to connect to the document store");
            return ReconcileOutcome::failed(&err);
        }
    };

    let payload = (!body.is_empty()).then_some(body);
    Reconciler::new((*state.config).clone(), store)
        .handle(payload)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReconcilerConfig;
    use likes_reconciler_repository::{DocumentStoreSource, InMemoryDocumentStore};
    use likes_reconciler_shared::{delete_grant_for, UserId, VoteRecord};
    use std::sync::Arc;

    const COLLECTION: &str = "video_interactions";

    fn memory_state(store: Arc<InMemoryDocumentStore>) -> AppState {
        AppState::new(
            ReconcilerConfig::default(),
            DocumentStoreSource::memory(store),
        )
    }

    fn vote(id: &str, owner: &str) -> VoteRecord {
        VoteRecord::new(id, "v1", vec![delete_grant_for(&UserId::new(owner))])
    }

    #[tokio::test]
    async fn test_execution_deletes_duplicates() {
        let store = Arc::new(InMemoryDocumentStore::with_records(
            COLLECTION,
            [vote("a", "u1"), vote("b", "u1")],
        ));
        let state = memory_state(store.clone());
        let body = serde_json::to_vec(&vote("b", "u1")).unwrap();

        let outcome = handle_execution(&state, None, &body).await;

        assert!(outcome.success);
        assert_eq!(outcome.status, StatusCode::OK);
        assert_eq!(outcome.deleted, Some(1));
        assert!(!store.contains(COLLECTION, "a"));
        assert!(store.contains(COLLECTION, "b"));
    }

    #[tokio::test]
    async fn test_execution_empty_body() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let state = memory_state(store.clone());

        let outcome = handle_execution(&state, None, b"").await;

        assert!(!outcome.success);
        assert_eq!(outcome.status, StatusCode::BAD_REQUEST);
        assert_eq!(store.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_execution_without_api_key() {
        let state = AppState::new(
            ReconcilerConfig::default(),
            DocumentStoreSource::appwrite("https://cloud.appwrite.io/v1", "supatube", "database"),
        );
        let body = serde_json::to_vec(&vote("b", "u1")).unwrap();

        let outcome = handle_execution(&state, None, &body).await;

        assert!(!outcome.success);
        assert_eq!(outcome.status, StatusCode::BAD_REQUEST);
        assert!(outcome.message.starts_with("Configuration error"));

        let outcome = handle_execution(&state, Some("  "), &body).await;
        assert_eq!(outcome.status, StatusCode::BAD_REQUEST);
    }
}
