//! Seam between the wizard and whatever persists drafts remotely.

use async_trait::async_trait;
use busdesk_core::{CompletionStatus, Draft};
use thiserror::Error;

/// A normalized remote failure: only a user-facing message survives.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct SyncError {
    pub message: String,
}

impl SyncError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

/// What the server returned for a successful submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitReceipt {
    /// Id of the created or updated entity, when the server reports one.
    pub entity_id: Option<String>,
    /// Credential issued by the server (first agency creation logs the user in).
    pub token: Option<String>,
    pub data: serde_json::Value,
}

/// Persists drafts of type `D` and reports server-side completion state.
#[async_trait]
pub trait RemoteSync<D: Draft>: Send + Sync {
    /// Persist the draft.
    async fn submit(&self, draft: &D) -> SyncResult<SubmitReceipt>;

    /// Persist the draft over an entity the server already holds.
    async fn update(&self, draft: &D) -> SyncResult<SubmitReceipt> {
        self.submit(draft).await
    }

    /// Server-authoritative completion flags, fetched after each mutation.
    async fn fetch_status(&self) -> SyncResult<CompletionStatus>;

    /// Action for steps that come after the submission step (for example
    /// assigning a manager to the station that was just created).
    async fn finalize(&self, receipt: &SubmitReceipt, draft: &D) -> SyncResult<()> {
        let _ = (receipt, draft);
        Ok(())
    }
}
