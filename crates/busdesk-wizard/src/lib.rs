//! Wizard Progress Engine: the state machine behind the agency and station
//! creation flows.
//!
//! A [`WizardSession`] owns a [`DraftStore`], a [`StepSequencer`] and a
//! [`RemoteSync`] adapter. Forward moves are gated by the per-step
//! predicates in [`gate`]; the submission step hands the draft to the
//! adapter and the returned completion status is projected by [`projector`].

pub mod error;
pub mod flow;
pub mod gate;
pub mod projector;
pub mod sequencer;
pub mod session;
pub mod step;
pub mod store;
pub mod sync;


pub use error::WizardError;
pub use flow::{AgencyFlow, Flow, StationFlow};
pub use gate::{FieldErrors, GateContext, GateReport};
pub use projector::{CompletionProjection, Landing};
pub use sequencer::{StepProgress, StepSequencer};
pub use session::{AgencyWizard, ContinueOutcome, StationWizard, WizardSession};
pub use step::{AgencyStep, StationStep, WizardStep};
pub use store::DraftStore;
pub use sync::{RemoteSync, SubmitReceipt, SyncError, SyncResult};
