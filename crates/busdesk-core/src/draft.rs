//! Draft records accumulated by the creation wizards.
//!
//! Scalar fields are `Option`s so that an untouched draft serializes as `{}`
//! and a patch can tell "absent" from "set". Collections live on the draft
//! itself and are edited through the draft store, not through patches.

use serde::{Deserialize, Serialize};

use crate::agency::AgencyProfile;
use crate::contact::{ContactEntry, Coordinates, PaymentMethod};
use crate::files::PendingFile;

/// Common surface the wizard needs from any draft record.
pub trait Draft: Default + Clone + std::fmt::Debug + Send + Sync {
    /// Partial update: every `Some` field overwrites the draft's value.
    type Patch: Default + std::fmt::Debug;

    /// Shallow, last-write-wins merge of `patch` into `self`.
    fn merge(&mut self, patch: Self::Patch);

    fn contacts(&self) -> &[ContactEntry];
    fn contacts_mut(&mut self) -> &mut Vec<ContactEntry>;
    fn towns(&self) -> &[String];
    fn towns_mut(&mut self) -> &mut Vec<String>;
    fn images(&self) -> &[PendingFile];
    fn images_mut(&mut self) -> &mut Vec<PendingFile>;
    fn payment_methods(&self) -> &[PaymentMethod];
    fn payment_methods_mut(&mut self) -> &mut Vec<PaymentMethod>;
}

/// Town names compare trimmed and case-insensitively, accents included
/// (`Éséka` and `ÉSÉKA` are one town).
#[must_use]
pub fn same_town(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Trim, drop blanks, and remove case-insensitive duplicates while keeping
/// first-seen order.
#[must_use]
pub fn normalize_towns(towns: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(towns.len());
    for town in towns {
        let trimmed = town.trim();
        if trimmed.is_empty() || out.iter().any(|t| same_town(t, trimmed)) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}

fn set_if_some<T>(slot: &mut Option<T>, value: Option<T>) {
    if let Some(v) = value {
        *slot = Some(v);
    }
}

// ---------------------------------------------------------------------------
// Station
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_town: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destinations: Vec<String>,
    #[serde(default, rename = "contactInfo", skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<ContactEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_email: Option<String>,
    #[serde(skip)]
    pub images: Vec<PendingFile>,
}

#[derive(Debug, Clone, Default)]
pub struct StationPatch {
    pub name: Option<String>,
    pub neighborhood: Option<String>,
    pub base_town: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub coordinates: Option<Coordinates>,
    /// Replaces the whole destination list (normalized to set semantics).
    pub destinations: Option<Vec<String>>,
    pub manager_email: Option<String>,
}

impl Draft for StationDraft {
    type Patch = StationPatch;

    fn merge(&mut self, patch: StationPatch) {
        set_if_some(&mut self.name, patch.name);
        set_if_some(&mut self.neighborhood, patch.neighborhood);
        set_if_some(&mut self.base_town, patch.base_town);
        set_if_some(&mut self.address, patch.address);
        set_if_some(&mut self.description, patch.description);
        set_if_some(&mut self.coordinates, patch.coordinates);
        set_if_some(&mut self.manager_email, patch.manager_email);
        if let Some(destinations) = patch.destinations {
            self.destinations = normalize_towns(destinations);
        }
    }

    fn contacts(&self) -> &[ContactEntry] {
        &self.contacts
    }
    fn contacts_mut(&mut self) -> &mut Vec<ContactEntry> {
        &mut self.contacts
    }
    fn towns(&self) -> &[String] {
        &self.destinations
    }
    fn towns_mut(&mut self) -> &mut Vec<String> {
        &mut self.destinations
    }
    fn images(&self) -> &[PendingFile] {
        &self.images
    }
    fn images_mut(&mut self) -> &mut Vec<PendingFile> {
        &mut self.images
    }
    fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }
    fn payment_methods_mut(&mut self) -> &mut Vec<PaymentMethod> {
        &mut self.payment_methods
    }
}

// ---------------------------------------------------------------------------
// Agency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub towns: Vec<String>,
    #[serde(default, rename = "contactInfo", skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<ContactEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(skip)]
    pub images: Vec<PendingFile>,
}

#[derive(Debug, Clone, Default)]
pub struct AgencyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub head_address: Option<String>,
    pub coordinates: Option<Coordinates>,
    /// Replaces the whole town list (normalized to set semantics).
    pub towns: Option<Vec<String>>,
}

impl Draft for AgencyDraft {
    type Patch = AgencyPatch;

    fn merge(&mut self, patch: AgencyPatch) {
        set_if_some(&mut self.name, patch.name);
        set_if_some(&mut self.description, patch.description);
        set_if_some(&mut self.head_address, patch.head_address);
        set_if_some(&mut self.coordinates, patch.coordinates);
        if let Some(towns) = patch.towns {
            self.towns = normalize_towns(towns);
        }
    }

    fn contacts(&self) -> &[ContactEntry] {
        &self.contacts
    }
    fn contacts_mut(&mut self) -> &mut Vec<ContactEntry> {
        &mut self.contacts
    }
    fn towns(&self) -> &[String] {
        &self.towns
    }
    fn towns_mut(&mut self) -> &mut Vec<String> {
        &mut self.towns
    }
    fn images(&self) -> &[PendingFile] {
        &self.images
    }
    fn images_mut(&mut self) -> &mut Vec<PendingFile> {
        &mut self.images
    }
    fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }
    fn payment_methods_mut(&mut self) -> &mut Vec<PaymentMethod> {
        &mut self.payment_methods
    }
}

impl From<&AgencyProfile> for AgencyDraft {
    fn from(profile: &AgencyProfile) -> Self {
        Self {
            name: Some(profile.name.clone()),
            description: profile.description.clone(),
            head_address: profile.head_address.clone(),
            coordinates: profile.coordinates,
            towns: normalize_towns(profile.towns.clone()),
            contacts: profile.contact_info.clone(),
            payment_methods: Vec::new(),
            images: Vec::new(),
        }
    }
}
