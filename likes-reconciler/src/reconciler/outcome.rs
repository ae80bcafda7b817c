//! Pass reports and the result returned to the invoker.

use std::fmt;

use axum::http::StatusCode;
use likes_reconciler_repository::DocumentStoreError;
use likes_reconciler_shared::UserId;
use serde::Serialize;

use crate::errors::ReconcileError;

/// Steps of a reconciliation pass, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    Querying,
    Reconciling,
    Reporting,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Validating => "validating",
            Phase::Querying => "querying",
            Phase::Reconciling => "reconciling",
            Phase::Reporting => "reporting",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate document that could not be deleted.
#[derive(Debug, Clone)]
pub struct FailedDelete {
    pub id: String,
    pub error: DocumentStoreError,
}

/// What one completed pass saw and did.
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub trigger_id: String,
    pub video_id: String,
    pub owner: UserId,
    /// Documents returned by the listing, the trigger included.
    pub examined: usize,
    /// Ids of documents this pass deleted.
    pub deleted: Vec<String>,
    pub skipped_foreign_owner: usize,
    pub skipped_unknown_owner: usize,
    pub skipped_other_video: usize,
    /// Same owner, but created after the trigger.
    pub skipped_newer: usize,
    /// Deletes answered with not found, e.g. removed by a concurrent pass.
    pub already_gone: usize,
    pub failed: Vec<FailedDelete>,
    /// The trigger was no longer in the store, so nothing was deleted.
    pub trigger_superseded: bool,
}

impl ReconcileReport {
    pub fn new(trigger_id: impl Into<String>, video_id: impl Into<String>, owner: UserId) -> Self {
        Self {
            trigger_id: trigger_id.into(),
            video_id: video_id.into(),
            owner,
            examined: 0,
            deleted: Vec::new(),
            skipped_foreign_owner: 0,
            skipped_unknown_owner: 0,
            skipped_other_video: 0,
            skipped_newer: 0,
            already_gone: 0,
            failed: Vec::new(),
            trigger_superseded: false,
        }
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn summary(&self) -> String {
        if self.trigger_superseded {
            return format!(
                "Vote {} for video {} was already superseded; nothing deleted",
                self.trigger_id, self.video_id
            );
        }
        let mut summary = format!(
            "Deleted {} superseded vote(s) for video {} by user {}",
            self.deleted_count(),
            self.video_id,
            self.owner
        );
        if !self.failed.is_empty() {
            summary.push_str(&format!("; {} delete(s) failed", self.failed_count()));
        }
        summary
    }
}

/// Result returned to the invoker of a pass.
///
/// Serializes as `{ "success": bool, "message": string }`, with the pass
/// counts added when the pass completed.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examined: Option<usize>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ReconcileOutcome {
    /// A completed pass. Always 200, whatever was or was not deleted.
    pub fn succeeded(report: &ReconcileReport) -> Self {
        Self {
            success: true,
            message: report.summary(),
            deleted: Some(report.deleted_count()),
            failed: Some(report.failed_count()),
            examined: Some(report.examined),
            status: StatusCode::OK,
        }
    }

    /// A pass that ended before completing.
    pub fn failed(error: &ReconcileError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            deleted: None,
            failed: None,
            examined: None,
            status: error.status_code(),
        }
    }
}

impl From<Result<ReconcileReport, ReconcileError>> for ReconcileOutcome {
    fn from(result: Result<ReconcileReport, ReconcileError>) -> Self {
        match result {
            Ok(report) => Self::succeeded(&report),
            Err(error) => Self::failed(&error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body() {
        let mut report = ReconcileReport::new("d", "v1", UserId::new("u1"));
        report.examined = 4;
        report.deleted = vec!["a".to_string(), "b".to_string()];

        let outcome = ReconcileOutcome::succeeded(&report);
        let body = serde_json::to_value(&outcome).unwrap();

        assert_eq!(outcome.status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["deleted"], 2);
        assert_eq!(body["failed"], 0);
        assert_eq!(body["examined"], 4);
        assert!(body["message"].as_str().unwrap().contains("Deleted 2"));
        assert!(body.get("status").is_none());
    }

    #[test]
    fn test_summary_mentions_failures() {
        let mut report = ReconcileReport::new("d", "v1", UserId::new("u1"));
        report.failed.push(FailedDelete {
            id: "b".to_string(),
            error: DocumentStoreError::transient("timeout"),
        });

        assert!(report.summary().contains("1 delete(s) failed"));
    }

    #[test]
    fn test_summary_for_superseded_trigger() {
        let mut report = ReconcileReport::new("d", "v1", UserId::new("u1"));
        report.trigger_superseded = true;

        let outcome = ReconcileOutcome::succeeded(&report);
        assert!(outcome.success);
        assert!(outcome.message.contains("already superseded"));
        assert_eq!(outcome.deleted, Some(0));
    }

    #[test]
    fn test_failure_body() {
        let outcome = ReconcileOutcome::failed(&ReconcileError::validation("no owner"));
        let body = serde_json::to_value(&outcome).unwrap();

        assert_eq!(outcome.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({"success": false, "message": "Validation error: no owner"})
        );
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Validating.to_string(), "validating");
        assert_eq!(Phase::Reporting.as_str(), "reporting");
    }
}
