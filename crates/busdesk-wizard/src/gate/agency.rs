//! Step predicates for the agency creation flow.

use busdesk_core::AgencyDraft;

use super::{check_contacts, check_images, GateContext, GateReport};
use crate::step::AgencyStep;

#[must_use]
pub fn gate(step: AgencyStep, draft: &AgencyDraft, ctx: &GateContext) -> GateReport {
    let mut gate = GateReport::builder();
    match step {
        AgencyStep::BasicInformation => {
            gate.require_text("name", draft.name.as_ref());
            check_images(&mut gate, &draft.images, ctx);
        }
        AgencyStep::Location => {
            gate.require_text("headAddress", draft.head_address.as_ref())
                .require("coordinates", draft.coordinates.is_some());
            if draft.coordinates.is_some_and(|c| !c.is_in_range()) {
                gate.error("coordinates", "coordinates are out of range");
            }
        }
        AgencyStep::Towns => {
            gate.require("towns", !draft.towns.is_empty());
        }
        AgencyStep::Contact => check_contacts(&mut gate, &draft.contacts),
        AgencyStep::Review => {}
    }
    gate.finish()
}

#[cfg(test)]
mod tests {
    use busdesk_core::{ContactEntry, ContactKind, Coordinates};

    use super::*;

    #[test]
    fn location_requires_head_address_and_coordinates() {
        let mut draft = AgencyDraft {
            head_address: Some("Akwa, Douala".into()),
            ..AgencyDraft::default()
        };
        let report = gate(AgencyStep::Location, &draft, &GateContext::default());
        assert!(!report.can_continue);
        assert_eq!(report.missing, vec!["coordinates".to_string()]);
        draft.coordinates = Some(Coordinates::new(4.05, 9.7));
        assert!(gate(AgencyStep::Location, &draft, &GateContext::default()).can_continue);
    }

    #[test]
    fn towns_step_needs_one_town() {
        let mut draft = AgencyDraft::default();
        assert!(!gate(AgencyStep::Towns, &draft, &GateContext::default()).can_continue);
        draft.towns.push("Limbe".into());
        assert!(gate(AgencyStep::Towns, &draft, &GateContext::default()).can_continue);
    }

    #[test]
    fn contact_step_uses_shared_contact_rule() {
        let draft = AgencyDraft {
            contacts: vec![ContactEntry::new(ContactKind::Url, "https://acme.cm")],
            ..AgencyDraft::default()
        };
        assert!(gate(AgencyStep::Contact, &draft, &GateContext::default()).can_continue);
    }

    #[test]
    fn review_always_passes() {
        assert!(gate(AgencyStep::Review, &AgencyDraft::default(), &GateContext::default()).can_continue);
    }
}
