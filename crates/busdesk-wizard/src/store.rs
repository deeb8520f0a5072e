//! The draft store: a dumb merge target owned by one wizard session.

use busdesk_core::draft::{normalize_towns, same_town};
use busdesk_core::{ContactEntry, ContactKind, Draft, EntryId, PaymentMethod, PendingFile};

use crate::error::WizardError;

/// Holds the accumulating draft and hands out entry ids.
///
/// No validation happens here; the gate reads the draft separately.
#[derive(Debug, Clone)]
pub struct DraftStore<D: Draft> {
    draft: D,
    next_id: u64,
}

impl<D: Draft> Default for DraftStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Draft> DraftStore<D> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            draft: D::default(),
            next_id: 1,
        }
    }

    #[must_use]
    pub fn draft(&self) -> &D {
        &self.draft
    }

    /// Shallow merge of `patch`; every present key overwrites the old value.
    pub fn update_form_data(&mut self, patch: D::Patch) {
        tracing::trace!(?patch, "merging draft patch");
        self.draft.merge(patch);
    }

    /// Replace the draft wholesale, re-issuing ids for every collection entry.
    pub fn set_draft(&mut self, draft: D) {
        self.draft = draft;
        let mut next = self.next_id;
        for entry in self.draft.contacts_mut() {
            entry.id = EntryId(next);
            next += 1;
        }
        for method in self.draft.payment_methods_mut() {
            method.id = EntryId(next);
            next += 1;
        }
        self.next_id = next;
        let towns = std::mem::take(self.draft.towns_mut());
        *self.draft.towns_mut() = normalize_towns(towns);
    }

    /// Drop everything collected so far.
    pub fn clear(&mut self) {
        self.draft = D::default();
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    // -- contacts -----------------------------------------------------------

    /// Append an empty contact line of the given kind.
    pub fn add_contact(&mut self, kind: ContactKind) -> EntryId {
        self.add_contact_with(kind, String::new())
    }

    pub fn add_contact_with(&mut self, kind: ContactKind, value: impl Into<String>) -> EntryId {
        let id = self.allocate_id();
        let mut entry = ContactEntry::new(kind, value);
        entry.id = id;
        self.draft.contacts_mut().push(entry);
        id
    }

    /// Edit the value of an existing contact line in place.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::UnknownEntry`] if no contact carries `id`.
    pub fn update_contact(&mut self, id: EntryId, value: impl Into<String>) -> Result<(), WizardError> {
        let entry = self
            .draft
            .contacts_mut()
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(WizardError::UnknownEntry(id))?;
        entry.value = value.into();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`WizardError::IndexOutOfRange`] if `index` is past the end.
    pub fn remove_contact(&mut self, index: usize) -> Result<ContactEntry, WizardError> {
        let contacts = self.draft.contacts_mut();
        check_index("contacts", index, contacts.len())?;
        Ok(contacts.remove(index))
    }

    // -- towns --------------------------------------------------------------

    /// Add a town unless it is blank or already present (case-insensitive).
    pub fn add_town(&mut self, town: &str) -> bool {
        let trimmed = town.trim();
        let towns = self.draft.towns_mut();
        if trimmed.is_empty() || towns.iter().any(|t| same_town(t, trimmed)) {
            return false;
        }
        towns.push(trimmed.to_string());
        true
    }

    pub fn remove_town(&mut self, town: &str) -> bool {
        let towns = self.draft.towns_mut();
        let before = towns.len();
        towns.retain(|t| !same_town(t, town));
        towns.len() != before
    }

    // -- images -------------------------------------------------------------

    pub fn add_image(&mut self, file: PendingFile) -> usize {
        let images = self.draft.images_mut();
        images.push(file);
        images.len() - 1
    }

    /// # Errors
    ///
    /// Returns [`WizardError::IndexOutOfRange`] if `index` is past the end.
    pub fn remove_image(&mut self, index: usize) -> Result<PendingFile, WizardError> {
        let images = self.draft.images_mut();
        check_index("images", index, images.len())?;
        Ok(images.remove(index))
    }

    // -- payment methods ----------------------------------------------------

    pub fn add_payment_method(&mut self, mut method: PaymentMethod) -> EntryId {
        let id = self.allocate_id();
        method.id = id;
        self.draft.payment_methods_mut().push(method);
        id
    }

    /// # Errors
    ///
    /// Returns [`WizardError::IndexOutOfRange`] if `index` is past the end.
    pub fn remove_payment_method(&mut self, index: usize) -> Result<PaymentMethod, WizardError> {
        let methods = self.draft.payment_methods_mut();
        check_index("payment_methods", index, methods.len())?;
        Ok(methods.remove(index))
    }
}

fn check_index(collection: &'static str, index: usize, len: usize) -> Result<(), WizardError> {
    if index < len {
        Ok(())
    } else {
        Err(WizardError::IndexOutOfRange {
            collection,
            index,
            len,
        })
    }
}
