//! Configuration for the likes reconciler.
//!
//! Settings are read once at startup into a [`ReconcilerConfig`] and handed to
//! the reconciler and the server state; nothing reads the environment per
//! execution.

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use likes_reconciler_repository::DocumentStoreSource;

use crate::errors::ReconcileError;

/// Default database id.
pub const DEFAULT_DATABASE_ID: &str = "database";

/// Default collection holding like/dislike interaction documents.
pub const DEFAULT_COLLECTION_ID: &str = "video_interactions";

/// Default bound on vote documents listed per video in one pass.
///
/// Documents beyond this bound are not seen by the pass; raise
/// `RECONCILER_QUERY_LIMIT` if a video can accumulate more stale votes from a
/// single user.
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Default listen host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Settings for the reconciler and its execution server.
#[derive(Clone)]
pub struct ReconcilerConfig {
    pub endpoint: Option<String>,
    pub project_id: Option<String>,
    /// Fallback API key for executions that arrive without an `x-appwrite-key` header.
    pub api_key: Option<String>,
    pub database_id: String,
    pub collection_id: String,
    pub query_limit: usize,
    pub host: String,
    pub port: u16,
}

impl fmt::Debug for ReconcilerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconcilerConfig")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("database_id", &self.database_id)
            .field("collection_id", &self.collection_id)
            .field("query_limit", &self.query_limit)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            project_id: None,
            api_key: None,
            database_id: DEFAULT_DATABASE_ID.to_string(),
            collection_id: DEFAULT_COLLECTION_ID.to_string(),
            query_limit: DEFAULT_QUERY_LIMIT,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ReconcilerConfig {
    /// Create a config with a custom query limit.
    pub fn with_query_limit(mut self, query_limit: usize) -> Self {
        self.query_limit = query_limit;
        self
    }

    /// Initialize the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `APPWRITE_FUNCTION_API_ENDPOINT`: Appwrite API endpoint (required)
    /// - `APPWRITE_FUNCTION_PROJECT_ID`: Appwrite project id (required)
    /// - `APPWRITE_API_KEY`: API key used when a request carries none
    /// - `APPWRITE_DATABASE_ID`: Database id (default: database)
    /// - `VIDEO_INTERACTIONS_COLLECTION_ID`: Vote collection (default: video_interactions)
    /// - `RECONCILER_QUERY_LIMIT`: Documents listed per pass (default: 100)
    /// - `SERVER_HOST`: Listen host (default: 0.0.0.0)
    /// - `SERVER_PORT`: Listen port (default: 3000)
    pub fn from_env() -> Result<Self, ReconcileError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Initialize the configuration from an arbitrary variable lookup.
    ///
    /// # Returns
    ///
    /// * `Ok(ReconcilerConfig)` - A complete configuration
    /// * `Err(ReconcileError::ConfigurationError)` - If a required setting is missing or invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReconcileError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let endpoint = get("APPWRITE_FUNCTION_API_ENDPOINT");
        let project_id = get("APPWRITE_FUNCTION_PROJECT_ID");

        let missing: Vec<&str> = [
            ("APPWRITE_FUNCTION_API_ENDPOINT", endpoint.is_none()),
            ("APPWRITE_FUNCTION_PROJECT_ID", project_id.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        if !missing.is_empty() {
            return Err(ReconcileError::config(format!(
                "Missing required settings: {}",
                missing.join(", ")
            )));
        }

        let query_limit = match get("RECONCILER_QUERY_LIMIT") {
            Some(raw) => raw.parse::<usize>().map_err(|e| {
                ReconcileError::config(format!("Invalid RECONCILER_QUERY_LIMIT '{}': {}", raw, e))
            })?,
            None => DEFAULT_QUERY_LIMIT,
        };

        let port = match get("SERVER_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                ReconcileError::config(format!("Invalid SERVER_PORT '{}': {}", raw, e))
            })?,
            None => DEFAULT_PORT,
        };

        let config = Self {
            endpoint,
            project_id,
            api_key: get("APPWRITE_API_KEY"),
            database_id: get("APPWRITE_DATABASE_ID")
                .unwrap_or_else(|| DEFAULT_DATABASE_ID.to_string()),
            collection_id: get("VIDEO_INTERACTIONS_COLLECTION_ID")
                .unwrap_or_else(|| DEFAULT_COLLECTION_ID.to_string()),
            query_limit,
            host: get("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the settings a reconciliation pass depends on.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.collection_id.trim().is_empty() {
            return Err(ReconcileError::config("Collection id is empty"));
        }
        if self.query_limit == 0 {
            return Err(ReconcileError::config("Query limit must be greater than 0"));
        }
        Ok(())
    }

    /// Build the Appwrite store source executions connect through.
    pub fn store_source(&self) -> Result<DocumentStoreSource, ReconcileError> {
        let (Some(endpoint), Some(project_id)) = (&self.endpoint, &self.project_id) else {
            return Err(ReconcileError::config(
                "Appwrite endpoint and project id are required",
            ));
        };
        Ok(DocumentStoreSource::appwrite(
            endpoint.clone(),
            project_id.clone(),
            self.database_id.clone(),
        ))
    }

    /// The address the execution server listens on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ReconcileError> {
        let ip: IpAddr = self.host.parse().map_err(|e| {
            ReconcileError::config(format!("Invalid SERVER_HOST '{}': {}", self.host, e))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
