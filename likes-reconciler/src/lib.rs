//! # Likes Reconciler
//!
//! Keeps at most one like/dislike document per user and video. Each time a vote
//! document is created, the reconciler deletes the same user's earlier vote
//! documents for that video. Ownership is read from the documents' permission
//! grants.
//!
//! ## Modules
//!
//! - [`config`]: Settings loaded once at startup
//! - [`errors`]: Error types and their HTTP status mapping
//! - [`reconciler`]: Trigger validation and the reconciliation pass
//! - [`server`]: HTTP execution endpoint

pub mod config;
pub mod errors;
pub mod reconciler;
pub mod server;

pub use config::ReconcilerConfig;
pub use errors::{ReconcileError, ServiceError};
pub use reconciler::{ReconcileOutcome, ReconcileReport, Reconciler};
