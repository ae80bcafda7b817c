//! Owner identity of a vote document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the user that owns a vote document.
///
/// Vote documents carry no owner column; a `UserId` only ever comes out of
/// [`derive_owner`](crate::derive_owner) or is built explicitly by callers
/// that create documents on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
