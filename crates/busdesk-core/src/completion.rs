//! Server-reported completion state of an agency.
//!
//! The client never computes these flags; it only reads the latest map the
//! server returned and projects it (see `busdesk_wizard::projector`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Required,
    PendingProcessing,
    Rejected,
    #[serde(alias = "approved")]
    Completed,
}

impl RequirementStatus {
    /// The user has something to do for this requirement.
    #[must_use]
    pub fn is_actionable(self) -> bool {
        matches!(self, RequirementStatus::Required | RequirementStatus::Rejected)
    }
}

impl std::fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequirementStatus::Required => write!(f, "required"),
            RequirementStatus::PendingProcessing => write!(f, "pending_processing"),
            RequirementStatus::Rejected => write!(f, "rejected"),
            RequirementStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub status: RequirementStatus,
    /// Reviewer note, usually present on `rejected`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Requirement {
    #[must_use]
    pub fn new(status: RequirementStatus) -> Self {
        Self {
            status,
            reason: None,
        }
    }
}

/// Named sub-requirements (`verification`, `stations`, ...) and their status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionStatus(BTreeMap<String, Requirement>);

impl CompletionStatus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used mostly by tests and fixtures.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, status: RequirementStatus) -> Self {
        self.0.insert(key.into(), Requirement::new(status));
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Requirement> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Requirement)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Requirement)> for CompletionStatus {
    fn from_iter<I: IntoIterator<Item = (String, Requirement)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
