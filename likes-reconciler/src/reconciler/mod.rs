//! The vote reconciler.
//!
//! A pass is triggered by the creation of one vote document. It lists every vote
//! document for the same video and deletes the ones owned by the same user,
//! leaving the trigger as that user's only vote.
//!
//! ## Flow
//!
//! 1. **Validating**: configuration, payload, `videoId`, and owner are checked
//!    before the store is touched. An owner that cannot be derived fails the
//!    pass closed.
//! 2. **Querying**: one bounded listing by `videoId`.
//! 3. **Reconciling**: candidates are evaluated and deleted one at a time; a
//!    failed delete is recorded and the pass moves on. Nothing is deleted when
//!    the trigger itself is missing from a complete listing.
//! 4. **Reporting**: the counts are summarized into a [`ReconcileOutcome`].

mod outcome;

pub use outcome::{FailedDelete, Phase, ReconcileOutcome, ReconcileReport};

use std::sync::Arc;

use likes_reconciler_repository::DocumentStore;
use likes_reconciler_shared::{UserId, VoteRecord};
use tracing::{debug, error, info, warn};

use crate::config::ReconcilerConfig;
use crate::errors::ReconcileError;

/// Attribute vote documents are listed by.
pub const VIDEO_ID_FIELD: &str = "videoId";

/// A trigger document that passed validation.
#[derive(Debug, Clone)]
pub struct Trigger {
    pub record: VoteRecord,
    pub video_id: String,
    pub owner: UserId,
}

impl Trigger {
    /// Validate a parsed trigger document.
    ///
    /// # Returns
    ///
    /// * `Ok(Trigger)` - If the document names a video and an owner
    /// * `Err(ReconcileError::ValidationError)` - Otherwise
    pub fn from_record(record: VoteRecord) -> Result<Self, ReconcileError> {
        if record.id.trim().is_empty() {
            return Err(ReconcileError::validation("Trigger document has an empty id"));
        }

        let video_id = record
            .video()
            .map(str::to_string)
            .ok_or_else(|| {
                ReconcileError::validation(format!(
                    "Trigger document {} has no videoId",
                    record.id
                ))
            })?;

        let owner = record.owner().ok_or_else(|| {
            ReconcileError::validation(format!(
                "Cannot determine the owner of trigger document {} from its permissions",
                record.id
            ))
        })?;

        Ok(Self {
            record,
            video_id,
            owner,
        })
    }
}

/// Parse the event payload into a vote document.
///
/// # Returns
///
/// * `Ok(VoteRecord)` - The parsed document
/// * `Err(ReconcileError::PayloadError)` - If the payload is missing, blank, or malformed
pub fn parse_payload(payload: Option<&[u8]>) -> Result<VoteRecord, ReconcileError> {
    let payload = payload
        .filter(|bytes| !bytes.iter().all(u8::is_ascii_whitespace))
        .ok_or_else(|| ReconcileError::payload("Missing event payload"))?;

    serde_json::from_slice(payload)
        .map_err(|e| ReconcileError::payload(format!("Malformed event payload: {}", e)))
}

/// Removes superseded vote documents for the owner of a trigger document.
pub struct Reconciler {
    config: ReconcilerConfig,
    store: Arc<dyn DocumentStore>,
}

impl Reconciler {
    /// Create a new reconciler over the given store.
    pub fn new(config: ReconcilerConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    /// Run a pass and convert its result for the invoker.
    ///
    /// Never fails: every error ends up in the returned outcome.
    pub async fn handle(&self, payload: Option<&[u8]>) -> ReconcileOutcome {
        let result = self.reconcile(payload).await;
        match &result {
            Ok(report) => info!(
                phase = %Phase::Reporting,
                trigger_id = %report.trigger_id,
                video_id = %report.video_id,
                owner = %report.owner,
                examined = report.examined,
                deleted = report.deleted_count(),
                failed = report.failed_count(),
                "Reconciliation succeeded"
            ),
            Err(e) => error!(
                phase = %Phase::Reporting,
                error = %e,
                status = e.status_code().as_u16(),
                "Reconciliation failed"
            ),
        }
        ReconcileOutcome::from(result)
    }

    /// Validate the payload and run a pass for it.
    pub async fn reconcile(&self, payload: Option<&[u8]>) -> Result<ReconcileReport, ReconcileError> {
        self.config.validate()?;
        let record = parse_payload(payload)?;
        let trigger = Trigger::from_record(record)?;

        info!(
            phase = %Phase::Validating,
            trigger_id = %trigger.record.id,
            video_id = %trigger.video_id,
            owner = %trigger.owner,
            kind = trigger.record.kind.as_deref().unwrap_or("unknown"),
            "Trigger accepted"
        );

        self.run_pass(&trigger).await
    }

    /// List the trigger's video and delete the owner's other vote documents.
    ///
    /// # Returns
    ///
    /// * `Ok(ReconcileReport)` - If the listing succeeded, whatever the deletes did
    /// * `Err(ReconcileError::QueryError)` - If the listing failed
    pub async fn run_pass(&self, trigger: &Trigger) -> Result<ReconcileReport, ReconcileError> {
        let collection = self.config.collection_id.as_str();
        let records = self
            .store
            .list_by_field(
                collection,
                VIDEO_ID_FIELD,
                &trigger.video_id,
                self.config.query_limit,
            )
            .await
            .map_err(ReconcileError::QueryError)?;

        info!(
            phase = %Phase::Querying,
            video_id = %trigger.video_id,
            returned = records.len(),
            limit = self.config.query_limit,
            "Listed vote documents"
        );
        if records.len() >= self.config.query_limit {
            warn!(
                video_id = %trigger.video_id,
                limit = self.config.query_limit,
                "Listing hit the query limit; documents beyond it are not reconciled"
            );
        }

        let mut report = ReconcileReport::new(
            trigger.record.id.clone(),
            trigger.video_id.clone(),
            trigger.owner.clone(),
        );
        report.examined = records.len();

        // A complete listing without the trigger means a newer pass already removed it.
        let complete = records.len() < self.config.query_limit;
        if complete && !records.iter().any(|r| r.id == trigger.record.id) {
            info!(
                phase = %Phase::Reconciling,
                trigger_id = %trigger.record.id,
                video_id = %trigger.video_id,
                "Trigger document is gone, leaving the remaining votes alone"
            );
            report.trigger_superseded = true;
            return Ok(report);
        }

        for candidate in &records {
            if candidate.id == trigger.record.id {
                continue;
            }

            if candidate.video() != Some(trigger.video_id.as_str()) {
                warn!(
                    phase = %Phase::Reconciling,
                    document_id = %candidate.id,
                    video_id = ?candidate.video_id,
                    expected_video_id = %trigger.video_id,
                    "Listing returned a document for another video, skipping"
                );
                report.skipped_other_video += 1;
                continue;
            }

            match candidate.owner() {
                None => {
                    warn!(
                        phase = %Phase::Reconciling,
                        document_id = %candidate.id,
                        permissions = ?candidate.permissions,
                        "Cannot determine owner of vote document, skipping"
                    );
                    report.skipped_unknown_owner += 1;
                    continue;
                }
                Some(owner) if owner != trigger.owner => {
                    debug!(
                        phase = %Phase::Reconciling,
                        document_id = %candidate.id,
                        owner = %owner,
                        "Vote document belongs to another user, skipping"
                    );
                    report.skipped_foreign_owner += 1;
                    continue;
                }
                Some(_) => {}
            }

            if candidate.is_newer_than(&trigger.record) {
                info!(
                    phase = %Phase::Reconciling,
                    document_id = %candidate.id,
                    "Vote document is newer than the trigger, leaving it to its own pass"
                );
                report.skipped_newer += 1;
                continue;
            }

            match self.store.delete_by_id(collection, &candidate.id).await {
                Ok(()) => {
                    info!(
                        phase = %Phase::Reconciling,
                        document_id = %candidate.id,
                        owner = %trigger.owner,
                        "Deleted superseded vote document"
                    );
                    report.deleted.push(candidate.id.clone());
                }
                Err(e) if e.is_not_found() => {
                    info!(
                        phase = %Phase::Reconciling,
                        document_id = %candidate.id,
                        "Vote document already deleted"
                    );
                    report.already_gone += 1;
                }
                Err(e) => {
                    error!(
                        phase = %Phase::Reconciling,
                        document_id = %candidate.id,
                        error = %e,
                        "Failed to delete superseded vote document, continuing"
                    );
                    report.failed.push(FailedDelete {
                        id: candidate.id.clone(),
                        error: e,
                    });
                }
            }
        }

        Ok(report)
    }
}
