//! Interface definitions for the document store.
//!
//! This module defines the abstract `DocumentStore` trait that allows for
//! dependency injection and swappable store implementations.

mod document_store;

pub use document_store::DocumentStore;
