//! Contact entries, coordinates and payment methods shared by both drafts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Identity of a collection entry inside a draft.
///
/// Assigned by the draft store from a monotonic counter; it never leaves the
/// process, so it is skipped on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactKind {
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "tel")]
    Tel,
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "whatsapp")]
    Whatsapp,
    /// MTN Mobile Money number.
    #[serde(rename = "MOMO")]
    Momo,
    /// Orange Money number.
    #[serde(rename = "OM")]
    OrangeMoney,
}

impl ContactKind {
    pub const ALL: [ContactKind; 6] = [
        ContactKind::Email,
        ContactKind::Tel,
        ContactKind::Url,
        ContactKind::Whatsapp,
        ContactKind::Momo,
        ContactKind::OrangeMoney,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContactKind::Email => "email",
            ContactKind::Tel => "tel",
            ContactKind::Url => "url",
            ContactKind::Whatsapp => "whatsapp",
            ContactKind::Momo => "MOMO",
            ContactKind::OrangeMoney => "OM",
        }
    }
}

impl std::fmt::Display for ContactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContactKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownContactKind(s.to_string()))
    }
}

/// One `{type, value}` contact line of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
    #[serde(skip)]
    pub id: EntryId,
    #[serde(rename = "type")]
    pub kind: ContactKind,
    #[serde(default)]
    pub value: String,
}

impl ContactEntry {
    #[must_use]
    pub fn new(kind: ContactKind, value: impl Into<String>) -> Self {
        Self {
            id: EntryId::default(),
            kind,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when both components are finite and inside WGS84 bounds.
    #[must_use]
    pub fn is_in_range(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentProvider {
    #[serde(rename = "MOMO")]
    Momo,
    #[serde(rename = "OM")]
    OrangeMoney,
    #[serde(rename = "bank")]
    Bank,
    #[serde(rename = "cash")]
    Cash,
}

impl PaymentProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentProvider::Momo => "MOMO",
            PaymentProvider::OrangeMoney => "OM",
            PaymentProvider::Bank => "bank",
            PaymentProvider::Cash => "cash",
        }
    }
}

impl std::fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentProvider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            PaymentProvider::Momo,
            PaymentProvider::OrangeMoney,
            PaymentProvider::Bank,
            PaymentProvider::Cash,
        ]
        .into_iter()
        .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| CoreError::UnknownPaymentProvider(s.to_string()))
    }
}

/// A payment channel the station accepts, pending submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    #[serde(skip)]
    pub id: EntryId,
    pub provider: PaymentProvider,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub account_number: String,
}

impl PaymentMethod {
    #[must_use]
    pub fn new(
        provider: PaymentProvider,
        account_name: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        Self {
            id: EntryId::default(),
            provider,
            account_name: account_name.into(),
            account_number: account_number.into(),
        }
    }
}
