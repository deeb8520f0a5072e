//! Step predicates for the station creation flow.

use busdesk_core::StationDraft;

use super::{check_contacts, check_images, check_payment_methods, rules, GateContext, GateReport};
use crate::step::StationStep;

#[must_use]
pub fn gate(step: StationStep, draft: &StationDraft, ctx: &GateContext) -> GateReport {
    let mut gate = GateReport::builder();
    match step {
        StationStep::BasicInformation => {
            gate.require_text("name", draft.name.as_ref())
                .require_text("baseTown", draft.base_town.as_ref());
        }
        StationStep::Location => {
            gate.require_text("address", draft.address.as_ref())
                .require("coordinates", draft.coordinates.is_some());
            if draft.coordinates.is_some_and(|c| !c.is_in_range()) {
                gate.error("coordinates", "coordinates are out of range");
            }
        }
        StationStep::Images => check_images(&mut gate, &draft.images, ctx),
        StationStep::Payment => check_payment_methods(&mut gate, &draft.payment_methods),
        StationStep::Contact => check_contacts(&mut gate, &draft.contacts),
        StationStep::AssignManager => {
            gate.require_text("managerEmail", draft.manager_email.as_ref());
            if let Some(email) = draft.manager_email.as_deref() {
                if !email.trim().is_empty() && !rules::is_valid_email(email) {
                    gate.error("managerEmail", "invalid email format");
                }
            }
        }
    }
    gate.finish()
}
