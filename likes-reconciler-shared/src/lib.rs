//! # Likes Reconciler Shared
//!
//! This crate defines the data structures shared by the likes reconciler crates:
//! the vote document as stored in the document store, the owner identity, and
//! the rule that derives an owner from a document's permission grants.

pub mod permissions;
pub mod types;

pub use permissions::{delete_grant_for, derive_owner, read_grant_for, update_grant_for};
pub use types::user_id::UserId;
pub use types::vote_record::VoteRecord;
