//! Flow definitions: which steps exist, how each is gated, and where the
//! draft is handed to the remote service.

use busdesk_core::{AgencyDraft, CompletionStatus, Draft, RequirementStatus, StationDraft};

use crate::gate::{self, GateContext, GateReport};
use crate::step::{AgencyStep, StationStep, WizardStep};

pub trait Flow: Send + Sync + 'static {
    type Step: WizardStep;
    type Draft: Draft;

    /// Name used in log fields.
    const NAME: &'static str;

    fn gate(step: Self::Step, draft: &Self::Draft, ctx: &GateContext) -> GateReport;

    /// The step whose "continue" hands the draft to the remote service.
    fn submit_step() -> Self::Step;

    /// Whole-draft checks run before submission, in priority order.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message of the first failing check.
    fn presubmit(draft: &Self::Draft, ctx: &GateContext) -> Result<(), String> {
        for step in Self::Step::ORDER {
            if step.index() > Self::submit_step().index() {
                break;
            }
            let report = Self::gate(*step, draft, ctx);
            if !report.can_continue {
                return Err(format!("{} step: {}", step.label(), report.summary()));
            }
        }
        Ok(())
    }

    /// Step to resume at when the server already reports progress.
    fn resume_step(status: &CompletionStatus) -> Option<Self::Step> {
        let _ = status;
        None
    }

    /// Whether the server already holds the entity this flow edits, in which
    /// case submission updates it instead of creating a new one.
    fn already_persisted(status: &CompletionStatus) -> bool {
        let _ = status;
        false
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StationFlow;

impl Flow for StationFlow {
    type Step = StationStep;
    type Draft = StationDraft;

    const NAME: &'static str = "station";

    fn gate(step: StationStep, draft: &StationDraft, ctx: &GateContext) -> GateReport {
        gate::station::gate(step, draft, ctx)
    }

    fn submit_step() -> StationStep {
        StationStep::Contact
    }

    fn presubmit(draft: &StationDraft, ctx: &GateContext) -> Result<(), String> {
        if draft.payment_methods.is_empty() || draft.contacts.is_empty() {
            return Err("configure at least one payment method".to_string());
        }
        if gate::valid_contact_count(&draft.contacts) == 0 {
            return Err("add at least one valid contact".to_string());
        }
        for step in [
            StationStep::BasicInformation,
            StationStep::Location,
            StationStep::Images,
            StationStep::Payment,
            StationStep::Contact,
        ] {
            let report = Self::gate(step, draft, ctx);
            if !report.can_continue {
                return Err(format!("{} step: {}", step.label(), report.summary()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AgencyFlow;

impl Flow for AgencyFlow {
    type Step = AgencyStep;
    type Draft = AgencyDraft;

    const NAME: &'static str = "agency";

    fn gate(step: AgencyStep, draft: &AgencyDraft, ctx: &GateContext) -> GateReport {
        gate::agency::gate(step, draft, ctx)
    }

    fn submit_step() -> AgencyStep {
        AgencyStep::Review
    }

    /// An agency whose profile the server already holds only needs review.
    fn resume_step(status: &CompletionStatus) -> Option<AgencyStep> {
        Self::already_persisted(status).then_some(AgencyStep::Review)
    }

    fn already_persisted(status: &CompletionStatus) -> bool {
        status
            .get("profile")
            .is_some_and(|r| r.status != RequirementStatus::Required)
    }
}
