//! Appwrite document store implementation.
//!
//! This module provides the concrete implementation of `DocumentStore` backed by
//! the Appwrite Databases REST API.

mod client;
mod query;

pub use client::{AppwriteSettings, AppwriteStore};
pub use query::Query;
