// App state for the execution server
use std::sync::Arc;

use likes_reconciler_repository::DocumentStoreSource;

use crate::config::ReconcilerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ReconcilerConfig>,
    pub source: DocumentStoreSource,
}

impl AppState {
    pub fn new(config: ReconcilerConfig, source: DocumentStoreSource) -> Self {
        Self {
            config: Arc::new(config),
            source,
        }
    }
}
