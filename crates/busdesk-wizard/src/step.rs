/// A position in a fixed, linear wizard sequence.
pub trait WizardStep: Copy + Eq + std::fmt::Debug + Send + Sync + 'static {
    /// Every step in flow order. Must be non-empty.
    const ORDER: &'static [Self];

    /// Stable identifier used in logs and CLI output.
    fn label(self) -> &'static str;

    fn index(self) -> usize {
        Self::ORDER.iter().position(|s| *s == self).unwrap_or(0)
    }

    #[must_use]
    fn at(index: usize) -> Self {
        Self::ORDER[index.min(Self::ORDER.len() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationStep {
    BasicInformation,
    Location,
    Images,
    Payment,
    Contact,
    AssignManager,
}

impl WizardStep for StationStep {
    const ORDER: &'static [Self] = &[
        StationStep::BasicInformation,
        StationStep::Location,
        StationStep::Images,
        StationStep::Payment,
        StationStep::Contact,
        StationStep::AssignManager,
    ];

    fn label(self) -> &'static str {
        match self {
            StationStep::BasicInformation => "basic_information",
            StationStep::Location => "location",
            StationStep::Images => "images",
            StationStep::Payment => "payment",
            StationStep::Contact => "contact",
            StationStep::AssignManager => "assign_manager",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgencyStep {
    BasicInformation,
    Location,
    Towns,
    Contact,
    Review,
}

impl WizardStep for AgencyStep {
    const ORDER: &'static [Self] = &[
        AgencyStep::BasicInformation,
        AgencyStep::Location,
        AgencyStep::Towns,
        AgencyStep::Contact,
        AgencyStep::Review,
    ];

    fn label(self) -> &'static str {
        match self {
            AgencyStep::BasicInformation => "basic_information",
            AgencyStep::Location => "location",
            AgencyStep::Towns => "towns",
            AgencyStep::Contact => "contact",
            AgencyStep::Review => "review",
        }
    }
}
