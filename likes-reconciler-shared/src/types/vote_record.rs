//! Vote document types.
//!
//! This module defines the like/dislike interaction document as it is stored in
//! the `video_interactions` collection and delivered in creation events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::permissions::derive_owner;
use crate::types::user_id::UserId;

/// One user's like or dislike for one video.
///
/// Field names follow the document store's wire format (`$id`, `$permissions`,
/// `$createdAt`). Plain `id` and `permissions` are accepted as aliases so that
/// hand-written payloads parse as well.
///
/// `video_id` is optional at the parse level: a document without it is still a
/// well-formed payload, and rejecting it is a validation decision made by the
/// reconciler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoteRecord {
    #[serde(rename = "$id", alias = "id")]
    pub id: String,
    #[serde(rename = "videoId", default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(rename = "$permissions", alias = "permissions", default)]
    pub permissions: Vec<String>,
    #[serde(rename = "$createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// `like` or `dislike`. Carried for logging only.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl VoteRecord {
    /// Create a vote document for a video with the given permission grants.
    ///
    /// # Example
    ///
    /// ```
    /// use likes_reconciler_shared::{delete_grant_for, UserId, VoteRecord};
    ///
    /// let user = UserId::new("u1");
    /// let record = VoteRecord::new("doc-1", "video-1", vec![delete_grant_for(&user)]);
    /// assert_eq!(record.owner(), Some(user));
    /// ```
    pub fn new(id: impl Into<String>, video_id: impl Into<String>, permissions: Vec<String>) -> Self {
        Self {
            id: id.into(),
            video_id: Some(video_id.into()),
            permissions,
            created_at: None,
            kind: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// The owner derived from this document's permission grants.
    pub fn owner(&self) -> Option<UserId> {
        derive_owner(&self.permissions)
    }

    /// The video id, treating a blank value as absent.
    pub fn video(&self) -> Option<&str> {
        self.video_id
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Whether this document was created after `other`.
    ///
    /// Documents are ordered by `(created_at, id)`, so of two documents sharing a
    /// timestamp exactly one is newer. Returns `false` when either side has no
    /// creation timestamp.
    pub fn is_newer_than(&self, other: &VoteRecord) -> bool {
        match (self.created_at, other.created_at) {
            (Some(mine), Some(theirs)) => (mine, &self.id) > (theirs, &other.id),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_store_document() {
        let raw = r#"{
            "$id": "67f1c0",
            "$collectionId": "video_interactions",
            "$databaseId": "database",
            "$createdAt": "2025-04-06T10:15:00.000+00:00",
            "$updatedAt": "2025-04-06T10:15:00.000+00:00",
            "$permissions": ["read(\"user:u1\")", "update(\"user:u1\")", "delete(\"user:u1\")"],
            "videoId": "v1",
            "type": "like"
        }"#;

        let record: VoteRecord = serde_json::from_str(raw).unwrap();

        assert_eq!(record.id, "67f1c0");
        assert_eq!(record.video(), Some("v1"));
        assert_eq!(record.permissions.len(), 3);
        assert_eq!(record.kind.as_deref(), Some("like"));
        assert_eq!(
            record.created_at,
            Some(Utc.with_ymd_and_hms(2025, 4, 6, 10, 15, 0).unwrap())
        );
        assert_eq!(record.owner(), Some(UserId::new("u1")));
    }

    #[test]
    fn test_parse_plain_aliases() {
        let raw = r#"{"id": "a", "videoId": "v1", "permissions": []}"#;
        let record: VoteRecord = serde_json::from_str(raw).unwrap();

        assert_eq!(record.id, "a");
        assert!(record.permissions.is_empty());
        assert_eq!(record.owner(), None);
    }

    #[test]
    fn test_missing_video_id_still_parses() {
        let record: VoteRecord = serde_json::from_str(r#"{"$id": "a"}"#).unwrap();
        assert_eq!(record.video(), None);
    }

    #[test]
    fn test_blank_video_id_is_absent() {
        let record: VoteRecord = serde_json::from_str(r#"{"$id": "a", "videoId": "  "}"#).unwrap();
        assert_eq!(record.video(), None);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result = serde_json::from_str::<VoteRecord>(r#"{"videoId": "v1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_is_newer_than() {
        let older = VoteRecord::new("a", "v1", vec![])
            .with_created_at(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let newer = VoteRecord::new("b", "v1", vec![])
            .with_created_at(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 1).unwrap());
        let untimed = VoteRecord::new("c", "v1", vec![]);

        assert!(newer.is_newer_than(&older));
        assert!(!older.is_newer_than(&newer));
        assert!(!older.is_newer_than(&older));
        assert!(!untimed.is_newer_than(&older));
        assert!(!newer.is_newer_than(&untimed));
    }

    #[test]
    fn test_equal_timestamps_order_by_id() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let first = VoteRecord::new("a", "v1", vec![]).with_created_at(at);
        let second = VoteRecord::new("b", "v1", vec![]).with_created_at(at);

        assert!(second.is_newer_than(&first));
        assert!(!first.is_newer_than(&second));
        assert!(!first.is_newer_than(&first.clone()));
    }
}
