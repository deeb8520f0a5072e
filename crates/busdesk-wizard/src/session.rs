//! A running wizard: draft, step position, gate and remote adapter together.
//!
//! The session is the scoped store for one flow instance. It is created when
//! the flow starts and dropped when the user navigates away; nothing in it is
//! global.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use busdesk_core::CompletionStatus;

use crate::flow::{AgencyFlow, Flow, StationFlow};
use crate::gate::{GateContext, GateReport};
use crate::projector::{CompletionProjection, Landing};
use crate::sequencer::StepSequencer;
use crate::step::WizardStep;
use crate::store::DraftStore;
use crate::sync::{RemoteSync, SubmitReceipt, SyncResult};

pub type StationWizard<R> = WizardSession<StationFlow, R>;
pub type AgencyWizard<R> = WizardSession<AgencyFlow, R>;

/// Result of pressing "Continue".
#[derive(Debug, Clone, PartialEq)]
pub enum ContinueOutcome<S> {
    /// The gate passed and the sequencer moved to this step.
    Advanced(S),
    /// Local validation refused the move; nothing was sent.
    Blocked { message: String, report: GateReport },
    /// A remote call is already in flight.
    Busy,
    /// The draft was submitted.
    Submitted {
        receipt: SubmitReceipt,
        next: Option<S>,
        landing: Landing,
    },
    /// The last step's action succeeded; the caller navigates away.
    Finished { landing: Landing },
    /// The remote call failed; the draft and position are unchanged.
    Failed { message: String },
}

/// Clears the loading flag on drop, including when the owning future is
/// dropped mid-request.
struct LoadingGuard(Arc<AtomicBool>);

impl LoadingGuard {
    fn engage(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(Arc::clone(flag)))
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct WizardSession<F: Flow, R> {
    store: DraftStore<F::Draft>,
    sequencer: StepSequencer<F::Step>,
    remote: R,
    ctx: GateContext,
    loading: Arc<AtomicBool>,
    status: Option<CompletionStatus>,
    receipt: Option<SubmitReceipt>,
}

impl<F, R> WizardSession<F, R>
where
    F: Flow,
    R: RemoteSync<F::Draft>,
{
    pub fn new(remote: R, ctx: GateContext) -> Self {
        Self {
            store: DraftStore::new(),
            sequencer: StepSequencer::new(),
            remote,
            ctx,
            loading: Arc::new(AtomicBool::new(false)),
            status: None,
            receipt: None,
        }
    }

    pub fn store(&self) -> &DraftStore<F::Draft> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DraftStore<F::Draft> {
        &mut self.store
    }

    pub fn sequencer(&self) -> &StepSequencer<F::Step> {
        &self.sequencer
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn current_step(&self) -> F::Step {
        self.sequencer.current()
    }

    /// Gate for the current step, recomputed from the draft on every call.
    pub fn gate_report(&self) -> GateReport {
        F::gate(self.current_step(), self.store.draft(), &self.ctx)
    }

    pub fn can_continue(&self) -> bool {
        !self.is_loading() && self.gate_report().can_continue
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Shared handle so another task can watch the loading flag.
    pub fn loading_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.loading)
    }

    pub fn status(&self) -> Option<&CompletionStatus> {
        self.status.as_ref()
    }

    pub fn receipt(&self) -> Option<&SubmitReceipt> {
        self.receipt.as_ref()
    }

    /// Projection of the latest fetched status (empty when none was fetched).
    pub fn projection(&self) -> CompletionProjection {
        CompletionProjection::from_status(&self.status.clone().unwrap_or_default())
    }

    pub fn landing(&self) -> Landing {
        self.projection().landing
    }

    pub fn prev_step(&mut self) -> bool {
        self.sequencer.prev_step()
    }

    /// Abandon the flow: clear the draft and return to the first step.
    pub fn cancel(&mut self) {
        tracing::info!(flow = F::NAME, "wizard cancelled");
        self.store.clear();
        self.sequencer.reset();
        self.receipt = None;
    }

    /// Re-read the server completion status.
    ///
    /// # Errors
    ///
    /// Returns the adapter's [`crate::SyncError`]; the previous status is kept.
    pub async fn refresh_status(&mut self) -> SyncResult<&CompletionStatus> {
        let _guard = LoadingGuard::engage(&self.loading);
        let status = self.remote.fetch_status().await?;
        Ok(&*self.status.insert(status))
    }

    /// Fetch the status and jump past steps the server already has.
    ///
    /// # Errors
    ///
    /// Returns the adapter's [`crate::SyncError`] if the status fetch fails.
    pub async fn resume(&mut self) -> SyncResult<CompletionProjection> {
        self.refresh_status().await?;
        if let Some(target) = self.status.as_ref().and_then(F::resume_step) {
            tracing::info!(flow = F::NAME, step = target.label(), "resuming wizard");
            self.sequencer.jump_to(target);
        }
        Ok(self.projection())
    }

    /// Status refresh after a mutation; a failure keeps the previous status.
    async fn refresh_after_mutation(&mut self) {
        match self.remote.fetch_status().await {
            Ok(status) => self.status = Some(status),
            Err(err) => {
                tracing::warn!(flow = F::NAME, error = %err, "status refresh after mutation failed");
            }
        }
    }

    /// Press "Continue" on the current step.
    pub async fn handle_continue(&mut self) -> ContinueOutcome<F::Step> {
        if self.is_loading() {
            return ContinueOutcome::Busy;
        }
        let step = self.current_step();
        let submit_index = F::submit_step().index();

        if self.receipt.is_some() && step.index() <= submit_index {
            // Already submitted; earlier steps are read-only from here on.
            self.sequencer.next_step();
            return ContinueOutcome::Advanced(self.current_step());
        }

        if step.index() < submit_index {
            return self.advance_if_open(step);
        }

        if step.index() == submit_index {
            return self.submit(step).await;
        }

        self.finalize(step).await
    }

    fn advance_if_open(&mut self, step: F::Step) -> ContinueOutcome<F::Step> {
        let report = F::gate(step, self.store.draft(), &self.ctx);
        if !report.can_continue {
            return ContinueOutcome::Blocked {
                message: report.summary(),
                report,
            };
        }
        self.sequencer.next_step();
        ContinueOutcome::Advanced(self.current_step())
    }

    async fn submit(&mut self, step: F::Step) -> ContinueOutcome<F::Step> {
        if let Err(message) = F::presubmit(self.store.draft(), &self.ctx) {
            tracing::debug!(flow = F::NAME, %message, "submission blocked locally");
            let report = F::gate(step, self.store.draft(), &self.ctx);
            return ContinueOutcome::Blocked { message, report };
        }

        let Some(guard) = LoadingGuard::engage(&self.loading) else {
            return ContinueOutcome::Busy;
        };
        let existing = self.status.as_ref().is_some_and(F::already_persisted);
        let result = if existing {
            self.remote.update(self.store.draft()).await
        } else {
            self.remote.submit(self.store.draft()).await
        };
        let receipt = match result {
            Ok(receipt) => receipt,
            Err(err) => {
                tracing::warn!(flow = F::NAME, error = %err, "draft submission failed");
                return ContinueOutcome::Failed {
                    message: err.message,
                };
            }
        };
        self.refresh_after_mutation().await;
        drop(guard);

        tracing::info!(
            flow = F::NAME,
            entity_id = receipt.entity_id.as_deref().unwrap_or("-"),
            existing,
            "draft submitted"
        );
        self.store.clear();
        self.receipt = Some(receipt.clone());
        let next = self.sequencer.next_step().then(|| self.current_step());
        ContinueOutcome::Submitted {
            receipt,
            next,
            landing: self.landing(),
        }
    }

    async fn finalize(&mut self, step: F::Step) -> ContinueOutcome<F::Step> {
        let report = F::gate(step, self.store.draft(), &self.ctx);
        if !report.can_continue {
            return ContinueOutcome::Blocked {
                message: report.summary(),
                report,
            };
        }
        let Some(receipt) = self.receipt.clone() else {
            return ContinueOutcome::Blocked {
                message: "the draft has not been submitted yet".to_string(),
                report,
            };
        };

        let Some(guard) = LoadingGuard::engage(&self.loading) else {
            return ContinueOutcome::Busy;
        };
        if let Err(err) = self.remote.finalize(&receipt, self.store.draft()).await {
            tracing::warn!(flow = F::NAME, step = step.label(), error = %err, "finalize failed");
            return ContinueOutcome::Failed {
                message: err.message,
            };
        }
        self.refresh_after_mutation().await;
        drop(guard);

        if self.sequencer.next_step() {
            return ContinueOutcome::Advanced(self.current_step());
        }
        self.store.clear();
        ContinueOutcome::Finished {
            landing: self.landing(),
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
