//! Ownership derivation from document permission grants.
//!
//! Vote documents are created by clients with document-level permissions that
//! only the voting user holds. The `delete` grant naming a user is the one the
//! reconciler trusts as the owner marker:
//!
//! ```text
//! delete("user:<id>")
//! delete("user:<id>/verified")
//! ```
//!
//! Any other grant (`delete("any")`, `delete("team:...")`, `read(...)`) says
//! nothing about ownership.

use crate::types::user_id::UserId;

const USER_ROLE_PREFIX: &str = "user:";

/// Derive the owner of a document from its permission grants.
///
/// Returns `None` when no delete grant names a user, or when delete grants name
/// two different users. Ownership is never guessed.
///
/// # Example
///
/// ```
/// use likes_reconciler_shared::{derive_owner, UserId};
///
/// let permissions = vec![
///     r#"read("user:u1")"#.to_string(),
///     r#"delete("user:u1")"#.to_string(),
/// ];
/// assert_eq!(derive_owner(&permissions), Some(UserId::new("u1")));
/// assert_eq!(derive_owner(&[r#"delete("any")"#.to_string()]), None);
/// ```
pub fn derive_owner(permissions: &[String]) -> Option<UserId> {
    let mut owner: Option<&str> = None;

    for permission in permissions {
        let Some(user) = delete_grantee(permission) else {
            continue;
        };
        match owner {
            None => owner = Some(user),
            Some(existing) if existing == user => {}
            Some(_) => return None,
        }
    }

    owner.map(UserId::new)
}

/// Build the delete grant that marks `user` as a document's owner.
pub fn delete_grant_for(user: &UserId) -> String {
    grant("delete", user)
}

/// Build the read grant a client attaches to its own vote documents.
pub fn read_grant_for(user: &UserId) -> String {
    grant("read", user)
}

/// Build the update grant a client attaches to its own vote documents.
pub fn update_grant_for(user: &UserId) -> String {
    grant("update", user)
}

fn grant(action: &str, user: &UserId) -> String {
    format!("{}(\"{}{}\")", action, USER_ROLE_PREFIX, user)
}

/// Extract the user id from a `delete("user:<id>")` grant.
fn delete_grantee(permission: &str) -> Option<&str> {
    let role = permission
        .trim()
        .strip_prefix("delete(\"")?
        .strip_suffix("\")")?;
    let user = role.strip_prefix(USER_ROLE_PREFIX)?;
    // Role dimension, e.g. `user:<id>/verified`.
    let user = user.split('/').next().unwrap_or_default();

    if user.is_empty() || user.contains('"') {
        return None;
    }
    Some(user)
}
