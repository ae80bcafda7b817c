//! # Likes Reconciler Repository
//!
//! This crate provides the document store abstraction the reconciler reads and
//! deletes vote documents through. It includes the error type, the
//! `DocumentStore` trait, a REST implementation for Appwrite, and an in-memory
//! implementation for tests and local runs.

pub mod appwrite;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod source;

pub use appwrite::{AppwriteSettings, AppwriteStore};
pub use errors::DocumentStoreError;
pub use interfaces::DocumentStore;
pub use memory::InMemoryDocumentStore;
pub use source::DocumentStoreSource;
