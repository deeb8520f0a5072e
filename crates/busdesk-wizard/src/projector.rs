//! Completion projector: pure functions over the latest [`CompletionStatus`].

use busdesk_core::{CompletionStatus, Requirement, RequirementStatus};

/// Known requirement keys in the order the completion flow visits them.
/// Unknown keys sort after these, alphabetically.
pub const REQUIREMENT_ORDER: &[&str] = &[
    "profile",
    "verification",
    "documents",
    "stations",
    "buses",
    "routes",
];

/// Where the user lands once a flow ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Landing {
    /// Publishable: the operational dashboard.
    Dashboard,
    /// Back into the completion flow at this requirement.
    Setup(String),
    /// Nothing actionable, but the server is still processing something.
    AwaitingReview,
}

impl Landing {
    #[must_use]
    pub fn route(&self) -> String {
        match self {
            Landing::Dashboard => "/agency/dashboard".to_string(),
            Landing::Setup(key) => format!("/agency/setup/{key}"),
            Landing::AwaitingReview => "/agency/setup/pending".to_string(),
        }
    }
}

fn precedence(key: &str) -> usize {
    REQUIREMENT_ORDER
        .iter()
        .position(|k| *k == key)
        .unwrap_or(REQUIREMENT_ORDER.len())
}

/// Requirements in completion-flow order.
#[must_use]
pub fn ordered(status: &CompletionStatus) -> Vec<(&str, &Requirement)> {
    let mut entries: Vec<(&str, &Requirement)> = status.iter().collect();
    entries.sort_by(|(a, _), (b, _)| precedence(a).cmp(&precedence(b)).then_with(|| a.cmp(b)));
    entries
}

/// Every requirement is completed. An empty map is not publishable: the
/// server has not told us anything yet.
#[must_use]
pub fn is_publishable(status: &CompletionStatus) -> bool {
    !status.is_empty()
        && status
            .iter()
            .all(|(_, r)| r.status == RequirementStatus::Completed)
}

/// Requirements the user has nothing to do for (completed or being processed).
#[must_use]
pub fn skippable(status: &CompletionStatus) -> Vec<&str> {
    ordered(status)
        .into_iter()
        .filter(|(_, r)| !r.status.is_actionable())
        .map(|(k, _)| k)
        .collect()
}

/// First requirement that is `required` or `rejected`.
#[must_use]
pub fn first_actionable(status: &CompletionStatus) -> Option<&str> {
    ordered(status)
        .into_iter()
        .find(|(_, r)| r.status.is_actionable())
        .map(|(k, _)| k)
}

#[must_use]
pub fn landing(status: &CompletionStatus) -> Landing {
    if is_publishable(status) {
        return Landing::Dashboard;
    }
    match first_actionable(status) {
        Some(key) => Landing::Setup(key.to_string()),
        None => Landing::AwaitingReview,
    }
}

/// Everything the UI derives from one status snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionProjection {
    pub publishable: bool,
    pub skippable: Vec<String>,
    pub actionable: Option<String>,
    pub landing: Landing,
}

impl CompletionProjection {
    #[must_use]
    pub fn from_status(status: &CompletionStatus) -> Self {
        Self {
            publishable: is_publishable(status),
            skippable: skippable(status).into_iter().map(str::to_string).collect(),
            actionable: first_actionable(status).map(str::to_string),
            landing: landing(status),
        }
    }
}
